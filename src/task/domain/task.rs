//! Task aggregate root and creation drafts.

use super::{OwnerId, TaskDomainError, TaskId, TaskPriority, TaskStatus, TaskType, TaskUpdate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest accepted title length, in characters.
pub const MAX_TITLE_CHARS: usize = 255;

/// Validated fields for a task that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    owner_id: OwnerId,
    title: String,
    description: String,
    task_type: TaskType,
    input: String,
    priority: TaskPriority,
    agent_config: Option<String>,
}

impl TaskDraft {
    /// Creates a draft with medium priority and no agent configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the title is empty or longer than
    /// [`MAX_TITLE_CHARS`], or when the description or input is empty.
    pub fn new(
        owner_id: OwnerId,
        title: impl Into<String>,
        description: impl Into<String>,
        task_type: TaskType,
        input: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        let raw_title = title.into();
        let trimmed_title = raw_title.trim();
        if trimmed_title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let title_chars = trimmed_title.chars().count();
        if title_chars > MAX_TITLE_CHARS {
            return Err(TaskDomainError::TitleTooLong(title_chars));
        }

        let description_text = description.into();
        if description_text.trim().is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }
        let input_text = input.into();
        if input_text.trim().is_empty() {
            return Err(TaskDomainError::EmptyInput);
        }

        Ok(Self {
            owner_id,
            title: trimmed_title.to_owned(),
            description: description_text,
            task_type,
            input: input_text,
            priority: TaskPriority::default(),
            agent_config: None,
        })
    }

    /// Sets the task priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the agent-configuration reference. Blank values are ignored.
    #[must_use]
    pub fn with_agent_config(mut self, agent_config: impl Into<String>) -> Self {
        let value = agent_config.into();
        self.agent_config = (!value.trim().is_empty()).then_some(value);
        self
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the input text.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the agent-configuration reference, if any.
    #[must_use]
    pub fn agent_config(&self) -> Option<&str> {
        self.agent_config.as_deref()
    }

    /// Materializes the draft as a pending task with a store-assigned id.
    #[must_use]
    pub fn into_task(self, id: TaskId, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            task_type: self.task_type,
            input: self.input,
            priority: self.priority,
            agent_config: self.agent_config,
            status: TaskStatus::Pending,
            output: None,
            error_message: None,
            processing_time_ms: None,
            completed_at: None,
            created_at,
            updated_at: created_at,
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner_id: OwnerId,
    title: String,
    description: String,
    task_type: TaskType,
    input: String,
    priority: TaskPriority,
    agent_config: Option<String>,
    status: TaskStatus,
    output: Option<String>,
    error_message: Option<String>,
    processing_time_ms: Option<u64>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner identifier.
    pub owner_id: OwnerId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted task type.
    pub task_type: TaskType,
    /// Persisted input text.
    pub input: String,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted agent-configuration reference, if any.
    pub agent_config: Option<String>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted output of the latest successful attempt.
    pub output: Option<String>,
    /// Persisted error of the latest failed attempt.
    pub error_message: Option<String>,
    /// Persisted duration of the latest finished attempt.
    pub processing_time_ms: Option<u64>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner_id: data.owner_id,
            title: data.title,
            description: data.description,
            task_type: data.task_type,
            input: data.input,
            priority: data.priority,
            agent_config: data.agent_config,
            status: data.status,
            output: data.output,
            error_message: data.error_message,
            processing_time_ms: data.processing_time_ms,
            completed_at: data.completed_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the input text sent to the provider.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the agent-configuration reference, if any.
    #[must_use]
    pub fn agent_config(&self) -> Option<&str> {
        self.agent_config.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the output of the latest successful attempt.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Returns the error of the latest failed attempt.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns the duration of the latest finished attempt, in milliseconds.
    #[must_use]
    pub const fn processing_time_ms(&self) -> Option<u64> {
        self.processing_time_ms
    }

    /// Returns when the latest successful attempt finished.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a lifecycle update.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the update's
    /// status is not reachable from the current status. The task is left
    /// unchanged in that case.
    pub fn apply(&mut self, update: &TaskUpdate) -> Result<(), TaskDomainError> {
        let target = update.status();
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }

        self.status = target;
        update.output().clone().apply_to(&mut self.output);
        update.error_message().clone().apply_to(&mut self.error_message);
        if let Some(elapsed) = update.processing_time_ms() {
            self.processing_time_ms = Some(elapsed);
        }
        update.completed_at().clone().apply_to(&mut self.completed_at);
        self.updated_at = update.updated_at();
        Ok(())
    }
}
