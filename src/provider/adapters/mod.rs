//! Adapter implementations for the completion provider port.

pub mod groq;
pub mod memory;
