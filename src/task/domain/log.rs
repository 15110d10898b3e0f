//! Append-only execution log entries.

use super::{TaskId, TaskLogId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One diagnostic record about a task's execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLogEntry {
    id: TaskLogId,
    task_id: TaskId,
    message: String,
    created_at: DateTime<Utc>,
}

impl TaskLogEntry {
    /// Reconstructs an entry read from storage.
    #[must_use]
    pub const fn new(
        id: TaskLogId,
        task_id: TaskId,
        message: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            message,
            created_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> TaskLogId {
        self.id
    }

    /// Returns the task the entry belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the log message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns when the entry was written.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
