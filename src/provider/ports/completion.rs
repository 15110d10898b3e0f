//! Completion provider port.

use crate::provider::domain::{ChatMessage, ProviderOptions};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Lazily produced text fragments of a streamed completion.
///
/// The stream is finite and forward-only. Dropping it before exhaustion
/// releases the underlying connection.
pub type FragmentStream = BoxStream<'static, ProviderResult<String>>;

/// Message substituted when a failure carries no text of its own.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// External text-generation service contract.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Requests a completion and waits for the full generated text.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the request fails, the provider reports
    /// an error, or the response cannot be decoded.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &ProviderOptions,
    ) -> ProviderResult<String>;

    /// Requests a completion delivered as incremental text fragments.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the request cannot be started. Failures
    /// after the first fragment are yielded as stream items.
    async fn stream_complete(
        &self,
        messages: &[ChatMessage],
        options: &ProviderOptions,
    ) -> ProviderResult<FragmentStream>;
}

/// Errors returned by completion provider adapters.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider rejected or failed the request.
    #[error("{message}")]
    Upstream {
        /// HTTP status reported by the provider, when known.
        status: Option<u16>,
        /// Provider-supplied error text.
        message: String,
    },

    /// The request could not be delivered or the connection dropped.
    #[error("{0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The provider answered with a payload that could not be decoded.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// The provider answered successfully but produced no text.
    #[error("provider returned an empty result")]
    EmptyResponse,

    /// The provider did not finish within the attempt deadline.
    #[error("provider call timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The adapter is misconfigured (for example, missing credentials).
    #[error("provider configuration error: {0}")]
    Configuration(String),
}

impl ProviderError {
    /// Creates an upstream error without a status code.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
        }
    }

    /// Wraps a transport-level error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Returns the text recorded against a failed task.
    ///
    /// Falls back to [`UNKNOWN_ERROR_MESSAGE`] when the error renders as an
    /// empty string.
    #[must_use]
    pub fn task_message(&self) -> String {
        let rendered = self.to_string();
        if rendered.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_owned()
        } else {
            rendered
        }
    }
}
