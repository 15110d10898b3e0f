//! Drains a streamed completion into a single string.

use crate::provider::ports::{FragmentStream, ProviderError};
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Text assembled from a fully drained fragment stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedOutput {
    text: String,
    fragment_count: usize,
    elapsed: Duration,
}

impl AggregatedOutput {
    /// Returns the concatenated text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the output and returns the concatenated text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Returns the number of fragments received.
    #[must_use]
    pub const fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    /// Returns the time spent draining the stream.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Errors raised while draining a fragment stream.
///
/// Partial text is carried for diagnostics only and must never be treated
/// as a result.
#[derive(Debug, Clone, Error)]
pub enum AggregationError {
    /// The stream yielded a provider failure.
    #[error("{source}")]
    Provider {
        /// Failure reported by the stream.
        source: ProviderError,
        /// Text received before the failure.
        partial: String,
    },

    /// Consumption was cancelled by the caller.
    #[error("stream consumption cancelled")]
    Cancelled {
        /// Text received before cancellation.
        partial: String,
    },
}

impl AggregationError {
    /// Returns the text received before the stream stopped.
    #[must_use]
    pub fn partial(&self) -> &str {
        match self {
            Self::Provider { partial, .. } | Self::Cancelled { partial } => partial,
        }
    }
}

/// Single-use consumer of one fragment stream.
///
/// [`StreamAggregator::aggregate`] consumes the aggregator, so one instance
/// serves exactly one attempt.
#[derive(Debug, Default)]
pub struct StreamAggregator {
    cancellation: CancellationToken,
}

impl StreamAggregator {
    /// Creates an aggregator that is never cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an aggregator that stops when `cancellation` fires.
    #[must_use]
    pub const fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }

    /// Drains `stream`, concatenating fragments in arrival order.
    ///
    /// The stream is dropped on every exit path, releasing the underlying
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError::Provider`] when the stream yields a
    /// failure and [`AggregationError::Cancelled`] when the cancellation
    /// token fires first.
    pub async fn aggregate(
        self,
        mut stream: FragmentStream,
    ) -> Result<AggregatedOutput, AggregationError> {
        let started = Instant::now();
        let mut text = String::new();
        let mut fragment_count: usize = 0;

        loop {
            let next = tokio::select! {
                biased;
                () = self.cancellation.cancelled() => {
                    debug!(fragment_count, "fragment stream cancelled");
                    return Err(AggregationError::Cancelled { partial: text });
                }
                next = stream.next() => next,
            };
            match next {
                Some(Ok(fragment)) => {
                    text.push_str(&fragment);
                    fragment_count = fragment_count.saturating_add(1);
                }
                Some(Err(source)) => {
                    debug!(fragment_count, error = %source, "fragment stream failed");
                    return Err(AggregationError::Provider {
                        source,
                        partial: text,
                    });
                }
                None => break,
            }
        }

        Ok(AggregatedOutput {
            text,
            fragment_count,
            elapsed: started.elapsed(),
        })
    }
}
