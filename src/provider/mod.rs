//! Completion provider integration for nlpforge.
//!
//! This module wraps the external text-generation service behind a single
//! port with two interaction shapes: one-shot completion and incrementally
//! streamed completion. It follows the same hexagonal split as the task
//! module:
//!
//! - Domain types in [`domain`] (chat messages, request options)
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`] (HTTP and scripted)
//! - Stream aggregation in [`services`]
//!
//! Runtime configuration for the HTTP adapter lives in [`config`].

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
