//! Domain model for completion requests.
//!
//! Messages and per-attempt options are plain values; nothing here performs
//! I/O or knows about a specific provider wire format.

mod error;
mod message;
mod options;

pub use error::ProviderDomainError;
pub use message::{ChatMessage, ChatRole};
pub use options::{
    DEFAULT_MAX_TOKENS, ExecutionMode, ProviderOptions, ReasoningEffort, Temperature,
};
