//! nlpforge: natural-language task execution pipeline.
//!
//! This crate accepts tasks describing a natural-language processing
//! request, dispatches them to an external text-generation provider, and
//! tracks each task from submission through completion or failure.
//!
//! # Architecture
//!
//! nlpforge follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, HTTP, etc.)
//!
//! # Modules
//!
//! - [`provider`]: Completion provider port, adapters, and stream aggregation
//! - [`task`]: Task records, execution attempts, and the execution log

pub mod provider;
pub mod task;
