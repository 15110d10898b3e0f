//! Error types for provider request validation.

use thiserror::Error;

/// Errors returned while constructing provider request values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderDomainError {
    /// The temperature is outside the external 0–100 scale.
    #[error("invalid temperature {0}, expected a value between 0 and 100")]
    InvalidTemperature(u32),

    /// The maximum output token count is zero.
    #[error("maximum output tokens must be greater than zero")]
    InvalidMaxTokens,

    /// The reasoning effort value is unsupported.
    #[error("unsupported reasoning effort: {0}")]
    InvalidReasoningEffort(String),

    /// The model identifier is empty after trimming.
    #[error("model identifier must not be empty")]
    EmptyModel,
}
