//! Service layer for task creation, retrieval, listing, and deletion.

use crate::task::{
    domain::{
        OwnerId, Task, TaskDomainError, TaskDraft, TaskId, TaskLogEntry, TaskPriority, TaskType,
    },
    ports::{TaskLogRepository, TaskLogRepositoryError, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Number of tasks returned by [`TaskLifecycleService::list_for_owner`] when
/// no limit is given.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Largest accepted listing limit.
pub const MAX_LIST_LIMIT: usize = 100;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    owner_id: i64,
    title: String,
    description: String,
    task_type: TaskType,
    input: String,
    priority: Option<TaskPriority>,
    agent_config: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with required task fields.
    #[must_use]
    pub fn new(
        owner_id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        task_type: TaskType,
        input: impl Into<String>,
    ) -> Self {
        Self {
            owner_id,
            title: title.into(),
            description: description.into(),
            task_type,
            input: input.into(),
            priority: None,
            agent_config: None,
        }
    }

    /// Sets task priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the agent-configuration reference.
    #[must_use]
    pub fn with_agent_config(mut self, agent_config: impl Into<String>) -> Self {
        self.agent_config = Some(agent_config.into());
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Execution log lookup failed.
    #[error(transparent)]
    Log(#[from] TaskLogRepositoryError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// The listing limit is outside `1..=MAX_LIST_LIMIT`.
    #[error("invalid list limit {0}, expected a value between 1 and 100")]
    InvalidListLimit(usize),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, L, C>
where
    R: TaskRepository,
    L: TaskLogRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    logs: Arc<L>,
    clock: Arc<C>,
}

impl<R, L, C> TaskLifecycleService<R, L, C>
where
    R: TaskRepository,
    L: TaskLogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, logs: Arc<L>, clock: Arc<C>) -> Self {
        Self {
            repository,
            logs,
            clock,
        }
    }

    /// Validates and stores a new `pending` task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when a field fails validation
    /// and [`TaskLifecycleError::Repository`] when the store rejects the
    /// write.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let owner_id = OwnerId::new(request.owner_id)?;
        let mut draft = TaskDraft::new(
            owner_id,
            request.title,
            request.description,
            request.task_type,
            request.input,
        )?;
        if let Some(priority) = request.priority {
            draft = draft.with_priority(priority);
        }
        if let Some(agent_config) = request.agent_config {
            draft = draft.with_agent_config(agent_config);
        }

        let task = self.repository.create(&draft, self.clock.utc()).await?;
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn find_by_id(&self, id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Lists an owner's tasks, newest first.
    ///
    /// `limit` defaults to [`DEFAULT_LIST_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::InvalidListLimit`] when `limit` is zero
    /// or above [`MAX_LIST_LIMIT`].
    pub async fn list_for_owner(
        &self,
        owner_id: OwnerId,
        limit: Option<usize>,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let effective = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        if !(1..=MAX_LIST_LIMIT).contains(&effective) {
            return Err(TaskLifecycleError::InvalidListLimit(effective));
        }
        Ok(self.repository.list_for_owner(owner_id, effective).await?)
    }

    /// Deletes a task owned by `owner_id`.
    ///
    /// Returns `false` when the task does not exist or belongs to someone
    /// else.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the store fails.
    pub async fn delete(&self, id: TaskId, owner_id: OwnerId) -> TaskLifecycleResult<bool> {
        Ok(self.repository.delete_owned(id, owner_id).await?)
    }

    /// Returns a task's execution log in chronological order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not
    /// exist.
    pub async fn logs_for_task(&self, id: TaskId) -> TaskLifecycleResult<Vec<TaskLogEntry>> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(TaskLifecycleError::NotFound(id));
        }
        Ok(self.logs.list_for_task(id).await?)
    }
}
