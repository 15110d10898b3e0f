//! Repository port for task persistence, lookup, and lifecycle updates.

use crate::task::domain::{OwnerId, Task, TaskDomainError, TaskDraft, TaskId, TaskUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new pending task and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the record cannot be
    /// written.
    async fn create(
        &self,
        draft: &TaskDraft,
        created_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Writes the lifecycle fields named by `update`, leaving all other
    /// fields untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::Domain`] when an adapter that validates
    /// transitions rejects the status change.
    async fn update(&self, id: TaskId, update: &TaskUpdate) -> TaskRepositoryResult<()>;

    /// Deletes a task if it belongs to `owner_id`.
    ///
    /// Returns `true` when a task was removed. Tasks owned by another user
    /// are left in place and reported as `false`.
    async fn delete_owned(&self, id: TaskId, owner_id: OwnerId) -> TaskRepositoryResult<bool>;

    /// Lists an owner's tasks, newest first, up to `limit` entries.
    async fn list_for_owner(
        &self,
        owner_id: OwnerId,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored task rejected the update.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
