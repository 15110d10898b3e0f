//! Task lifecycle management for nlpforge.
//!
//! This module owns the task record and everything that mutates it: creating
//! validated tasks, running execution attempts against a completion
//! provider, folding each attempt's outcome back into the record, and
//! keeping an append-only execution log. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
