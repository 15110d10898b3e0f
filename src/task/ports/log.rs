//! Repository port for the append-only execution log.

use crate::task::domain::{TaskId, TaskLogEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task log repository operations.
pub type TaskLogRepositoryResult<T> = Result<T, TaskLogRepositoryError>;

/// Execution log persistence contract.
///
/// Entries are never updated or deleted through this port.
#[async_trait]
pub trait TaskLogRepository: Send + Sync {
    /// Appends an entry for a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLogRepositoryError::Persistence`] when the entry cannot
    /// be written.
    async fn append(
        &self,
        task_id: TaskId,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> TaskLogRepositoryResult<TaskLogEntry>;

    /// Returns a task's entries oldest first, ties broken by entry id.
    async fn list_for_task(&self, task_id: TaskId) -> TaskLogRepositoryResult<Vec<TaskLogEntry>>;
}

/// Errors returned by task log repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskLogRepositoryError {
    /// Persistence-layer failure.
    #[error("log persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskLogRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
