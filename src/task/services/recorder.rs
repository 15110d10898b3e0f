//! Execution log recorder.

use crate::provider::domain::ExecutionMode;
use crate::task::{domain::TaskId, ports::TaskLogRepository};
use mockable::Clock;
use std::sync::Arc;
use tracing::warn;

/// Appends one log entry per lifecycle transition of an attempt.
///
/// Write failures are reported through `tracing` and never fail the
/// attempt that triggered them.
#[derive(Clone)]
pub struct ExecutionLogRecorder<L, C>
where
    L: TaskLogRepository,
    C: Clock + Send + Sync,
{
    logs: Arc<L>,
    clock: Arc<C>,
}

impl<L, C> ExecutionLogRecorder<L, C>
where
    L: TaskLogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a recorder writing to `logs`.
    #[must_use]
    pub const fn new(logs: Arc<L>, clock: Arc<C>) -> Self {
        Self { logs, clock }
    }

    /// Records that an attempt entered `processing`.
    pub async fn started(&self, task_id: TaskId, mode: ExecutionMode) {
        self.record(task_id, format!("execution started ({})", mode.as_str()))
            .await;
    }

    /// Records a successful attempt.
    pub async fn completed(&self, task_id: TaskId, processing_time_ms: u64) {
        self.record(
            task_id,
            format!("execution completed in {processing_time_ms}ms"),
        )
        .await;
    }

    /// Records a failed attempt.
    pub async fn failed(&self, task_id: TaskId, error_message: &str) {
        self.record(task_id, format!("execution failed: {error_message}"))
            .await;
    }

    async fn record(&self, task_id: TaskId, message: String) {
        if let Err(err) = self.logs.append(task_id, &message, self.clock.utc()).await {
            warn!(task_id = %task_id, error = %err, "failed to append execution log entry");
        }
    }
}
