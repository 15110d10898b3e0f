//! In-memory repository for the execution log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{TaskId, TaskLogEntry, TaskLogId},
    ports::{TaskLogRepository, TaskLogRepositoryError, TaskLogRepositoryResult},
};

/// Thread-safe in-memory execution log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskLogRepository {
    state: Arc<RwLock<Vec<TaskLogEntry>>>,
}

impl InMemoryTaskLogRepository {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskLogRepository for InMemoryTaskLogRepository {
    async fn append(
        &self,
        task_id: TaskId,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> TaskLogRepositoryResult<TaskLogEntry> {
        let mut entries = self.state.write().map_err(|err| {
            TaskLogRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let next_id = i64::try_from(entries.len())
            .map_err(TaskLogRepositoryError::persistence)?
            .saturating_add(1);
        let entry = TaskLogEntry::new(
            TaskLogId::from_raw(next_id),
            task_id,
            message.to_owned(),
            created_at,
        );
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn list_for_task(&self, task_id: TaskId) -> TaskLogRepositoryResult<Vec<TaskLogEntry>> {
        let entries = self.state.read().map_err(|err| {
            TaskLogRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut matching: Vec<TaskLogEntry> = entries
            .iter()
            .filter(|entry| entry.task_id() == task_id)
            .cloned()
            .collect();
        matching.sort_by_key(|entry| (entry.created_at(), entry.id()));
        Ok(matching)
    }
}
