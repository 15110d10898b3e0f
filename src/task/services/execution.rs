//! Service layer for running task execution attempts.
//!
//! One call to [`TaskExecutionService::execute`] (or one of its streamed
//! variants) is one attempt: the task moves to `processing`, the provider is
//! invoked, and the outcome is folded back into the record as `completed` or
//! `failed` before the call returns. Any failure after the task entered
//! `processing` is persisted before it is reported.

use super::{locks::TaskLocks, recorder::ExecutionLogRecorder};
use crate::provider::{
    domain::{ChatMessage, ExecutionMode, ProviderDomainError, ProviderOptions, Temperature},
    ports::{CompletionProvider, ProviderError},
    services::{AggregationError, StreamAggregator},
};
use crate::task::{
    domain::{TaskId, TaskUpdate, prompt::system_prompt},
    ports::{TaskLogRepository, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Error text recorded on a task whose streamed attempt was cancelled.
pub const CANCELLED_MESSAGE: &str = "execution cancelled";

/// Caller-supplied options for one execution attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteTaskRequest {
    temperature: Option<u32>,
    multi_agent: bool,
}

impl ExecuteTaskRequest {
    /// Creates a request using provider defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the temperature on the external 0–100 scale.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: u32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Tags the attempt with the multi-agent execution mode.
    #[must_use]
    pub const fn with_multi_agent(mut self, multi_agent: bool) -> Self {
        self.multi_agent = multi_agent;
        self
    }

    fn to_options(&self, streamed: bool) -> Result<ProviderOptions, ProviderDomainError> {
        let mode = if streamed {
            ExecutionMode::Streamed
        } else if self.multi_agent {
            ExecutionMode::MultiAgent
        } else {
            ExecutionMode::SingleShot
        };
        let mut options = ProviderOptions::new().with_mode(mode);
        if let Some(raw) = self.temperature {
            options = options.with_temperature(Temperature::new(raw)?);
        }
        Ok(options)
    }
}

/// Outcome of a successful attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    success: bool,
    result: String,
    processing_time_ms: u64,
}

impl ExecutionReport {
    const fn succeeded(result: String, processing_time_ms: u64) -> Self {
        Self {
            success: true,
            result,
            processing_time_ms,
        }
    }

    /// Returns whether the attempt completed the task.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// Returns the generated text.
    #[must_use]
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Consumes the report and returns the generated text.
    #[must_use]
    pub fn into_result(self) -> String {
        self.result
    }

    /// Returns the attempt duration in milliseconds.
    #[must_use]
    pub const fn processing_time_ms(&self) -> u64 {
        self.processing_time_ms
    }
}

/// Errors returned by execution attempts.
#[derive(Debug, Error)]
pub enum TaskExecutionError {
    /// The request options are invalid. The task was not touched.
    #[error("invalid execution request: {0}")]
    InvalidRequest(#[from] ProviderDomainError),

    /// The task does not exist. Nothing was written.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The provider failed or returned no text. The task is `failed`.
    #[error("{0}")]
    Provider(ProviderError),

    /// The streamed attempt was cancelled. The task is `failed`.
    #[error("execution cancelled")]
    Cancelled {
        /// Text received before cancellation, for diagnostics only.
        partial: String,
    },

    /// The record store failed.
    #[error(transparent)]
    Persistence(#[from] TaskRepositoryError),
}

/// Result type for execution attempts.
pub type TaskExecutionResult<T> = Result<T, TaskExecutionError>;

#[derive(Debug)]
enum AttemptPath {
    Complete,
    Stream(CancellationToken),
}

#[derive(Debug)]
enum AttemptFailure {
    Provider(ProviderError),
    Cancelled { partial: String },
}

impl AttemptFailure {
    fn task_message(&self) -> String {
        match self {
            Self::Provider(err) => err.task_message(),
            Self::Cancelled { .. } => CANCELLED_MESSAGE.to_owned(),
        }
    }

    fn into_error(self) -> TaskExecutionError {
        match self {
            Self::Provider(err) => TaskExecutionError::Provider(err),
            Self::Cancelled { partial } => TaskExecutionError::Cancelled { partial },
        }
    }
}

impl From<ProviderError> for AttemptFailure {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<AggregationError> for AttemptFailure {
    fn from(err: AggregationError) -> Self {
        match err {
            AggregationError::Provider { source, .. } => Self::Provider(source),
            AggregationError::Cancelled { partial } => Self::Cancelled { partial },
        }
    }
}

/// Runs execution attempts for stored tasks.
///
/// Attempts on the same task are serialized; attempts on different tasks
/// run concurrently.
#[derive(Clone)]
pub struct TaskExecutionService<R, L, P, C>
where
    R: TaskRepository,
    L: TaskLogRepository,
    P: CompletionProvider,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    provider: Arc<P>,
    clock: Arc<C>,
    recorder: ExecutionLogRecorder<L, C>,
    locks: Arc<TaskLocks>,
    attempt_timeout: Option<Duration>,
}

impl<R, L, P, C> TaskExecutionService<R, L, P, C>
where
    R: TaskRepository,
    L: TaskLogRepository,
    P: CompletionProvider,
    C: Clock + Send + Sync,
{
    /// Creates a new execution service.
    #[must_use]
    pub fn new(repository: Arc<R>, logs: Arc<L>, provider: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            repository,
            provider,
            recorder: ExecutionLogRecorder::new(logs, Arc::clone(&clock)),
            clock,
            locks: Arc::new(TaskLocks::new()),
            attempt_timeout: None,
        }
    }

    /// Bounds the provider phase of every attempt by `timeout`.
    ///
    /// An expired attempt fails with [`ProviderError::Timeout`].
    #[must_use]
    pub const fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Runs a single-shot attempt.
    ///
    /// # Errors
    ///
    /// Returns [`TaskExecutionError::InvalidRequest`] or
    /// [`TaskExecutionError::NotFound`] without touching the task,
    /// [`TaskExecutionError::Provider`] after persisting `failed`, and
    /// [`TaskExecutionError::Persistence`] when the store fails.
    pub async fn execute(
        &self,
        task_id: TaskId,
        request: ExecuteTaskRequest,
    ) -> TaskExecutionResult<ExecutionReport> {
        self.run_attempt(task_id, &request, AttemptPath::Complete)
            .await
    }

    /// Runs a streamed attempt and aggregates the fragments.
    ///
    /// # Errors
    ///
    /// Same as [`Self::execute`].
    pub async fn stream_execute(
        &self,
        task_id: TaskId,
        request: ExecuteTaskRequest,
    ) -> TaskExecutionResult<ExecutionReport> {
        self.run_attempt(
            task_id,
            &request,
            AttemptPath::Stream(CancellationToken::new()),
        )
        .await
    }

    /// Runs a streamed attempt that stops when `cancellation` fires.
    ///
    /// # Errors
    ///
    /// Same as [`Self::execute`], plus [`TaskExecutionError::Cancelled`]
    /// after persisting `failed` with [`CANCELLED_MESSAGE`].
    pub async fn stream_execute_with_cancellation(
        &self,
        task_id: TaskId,
        request: ExecuteTaskRequest,
        cancellation: CancellationToken,
    ) -> TaskExecutionResult<ExecutionReport> {
        self.run_attempt(task_id, &request, AttemptPath::Stream(cancellation))
            .await
    }

    async fn run_attempt(
        &self,
        task_id: TaskId,
        request: &ExecuteTaskRequest,
        path: AttemptPath,
    ) -> TaskExecutionResult<ExecutionReport> {
        let options = request.to_options(matches!(path, AttemptPath::Stream(_)))?;
        let _lock = self.locks.acquire(task_id).await;

        let task = self
            .repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskExecutionError::NotFound(task_id))?;

        let mode = options.mode();
        self.repository
            .update(task_id, &TaskUpdate::start_processing(self.clock.utc()))
            .await?;
        let started = Instant::now();
        info!(task_id = %task_id, mode = mode.as_str(), "task execution started");
        self.recorder.started(task_id, mode).await;

        let messages = [
            ChatMessage::system(system_prompt(task.task_type())),
            ChatMessage::user(task.input()),
        ];
        let outcome = self
            .bounded(self.invoke(&messages, &options, path))
            .await;
        let elapsed_ms = elapsed_millis(started);

        match outcome {
            Ok(text) => {
                self.repository
                    .update(
                        task_id,
                        &TaskUpdate::complete(text.clone(), elapsed_ms, self.clock.utc()),
                    )
                    .await?;
                info!(task_id = %task_id, elapsed_ms, "task execution completed");
                self.recorder.completed(task_id, elapsed_ms).await;
                Ok(ExecutionReport::succeeded(text, elapsed_ms))
            }
            Err(failure) => {
                let message = failure.task_message();
                self.repository
                    .update(
                        task_id,
                        &TaskUpdate::fail(message.clone(), elapsed_ms, self.clock.utc()),
                    )
                    .await?;
                warn!(task_id = %task_id, elapsed_ms, error = %message, "task execution failed");
                self.recorder.failed(task_id, &message).await;
                Err(failure.into_error())
            }
        }
    }

    async fn invoke(
        &self,
        messages: &[ChatMessage],
        options: &ProviderOptions,
        path: AttemptPath,
    ) -> Result<String, AttemptFailure> {
        let text = match path {
            AttemptPath::Complete => self.provider.complete(messages, options).await?,
            AttemptPath::Stream(cancellation) => {
                let stream = tokio::select! {
                    biased;
                    () = cancellation.cancelled() => {
                        debug!("cancelled before the fragment stream opened");
                        return Err(AttemptFailure::Cancelled {
                            partial: String::new(),
                        });
                    }
                    opened = self.provider.stream_complete(messages, options) => opened?,
                };
                let output = StreamAggregator::with_cancellation(cancellation)
                    .aggregate(stream)
                    .await?;
                debug!(
                    fragment_count = output.fragment_count(),
                    "fragment stream drained"
                );
                output.into_text()
            }
        };
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse.into());
        }
        Ok(text)
    }

    async fn bounded<F>(&self, attempt: F) -> Result<String, AttemptFailure>
    where
        F: Future<Output = Result<String, AttemptFailure>>,
    {
        match self.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, attempt)
                .await
                .unwrap_or_else(|_elapsed| Err(ProviderError::Timeout(limit).into())),
            None => attempt.await,
        }
    }
}

fn elapsed_millis(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
