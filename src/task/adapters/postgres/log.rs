//! `PostgreSQL` repository implementation for the execution log.

use super::{
    models::{NewTaskLogRow, TaskLogRow},
    repository::TaskPgPool,
    schema::task_logs,
};
use crate::task::{
    domain::{TaskId, TaskLogEntry, TaskLogId},
    ports::{TaskLogRepository, TaskLogRepositoryError, TaskLogRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed execution log.
#[derive(Debug, Clone)]
pub struct PostgresTaskLogRepository {
    pool: TaskPgPool,
}

impl PostgresTaskLogRepository {
    /// Creates a new log repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskLogRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskLogRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskLogRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskLogRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskLogRepository for PostgresTaskLogRepository {
    async fn append(
        &self,
        task_id: TaskId,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> TaskLogRepositoryResult<TaskLogEntry> {
        let new_row = NewTaskLogRow {
            task_id: task_id.value(),
            message: message.to_owned(),
            created_at,
        };
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(task_logs::table)
                .values(&new_row)
                .returning(TaskLogRow::as_returning())
                .get_result::<TaskLogRow>(connection)
                .map_err(TaskLogRepositoryError::persistence)?;
            row_to_entry(row)
        })
        .await
    }

    async fn list_for_task(&self, task_id: TaskId) -> TaskLogRepositoryResult<Vec<TaskLogEntry>> {
        self.run_blocking(move |connection| {
            let rows = task_logs::table
                .filter(task_logs::task_id.eq(task_id.value()))
                .order((task_logs::created_at.asc(), task_logs::id.asc()))
                .select(TaskLogRow::as_select())
                .load::<TaskLogRow>(connection)
                .map_err(TaskLogRepositoryError::persistence)?;
            rows.into_iter().map(row_to_entry).collect()
        })
        .await
    }
}

fn row_to_entry(row: TaskLogRow) -> TaskLogRepositoryResult<TaskLogEntry> {
    let TaskLogRow {
        id,
        task_id: raw_task_id,
        message,
        created_at,
    } = row;
    let task_id = TaskId::new(raw_task_id).map_err(TaskLogRepositoryError::persistence)?;
    Ok(TaskLogEntry::new(
        TaskLogId::from_raw(id),
        task_id,
        message,
        created_at,
    ))
}
