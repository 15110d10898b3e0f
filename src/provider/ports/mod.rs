//! Port contracts for completion providers.
//!
//! Ports define infrastructure-agnostic interfaces used by the task
//! execution service.

pub mod completion;

pub use completion::{
    CompletionProvider, FragmentStream, ProviderError, ProviderResult, UNKNOWN_ERROR_MESSAGE,
};
