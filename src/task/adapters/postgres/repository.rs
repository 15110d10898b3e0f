//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskRow, TaskLifecycleChangeset, TaskRow},
    schema::nlp_tasks,
};
use crate::task::{
    domain::{
        OwnerId, PersistedTaskData, Task, TaskDomainError, TaskDraft, TaskId, TaskPriority,
        TaskStatus, TaskType, TaskUpdate,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use tracing::warn;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(
        &self,
        draft: &TaskDraft,
        created_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let new_row = to_new_row(draft, created_at);
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(nlp_tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            row_to_task(row)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = nlp_tasks::table
                .filter(nlp_tasks::id.eq(id.value()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn update(&self, id: TaskId, update: &TaskUpdate) -> TaskRepositoryResult<()> {
        let changeset = to_changeset(update)?;
        let target = update.status();
        let allowed_sources: Vec<&'static str> = TaskStatus::ALL
            .into_iter()
            .filter(|status| status.can_transition_to(target))
            .map(TaskStatus::as_str)
            .collect();

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                nlp_tasks::table
                    .filter(nlp_tasks::id.eq(id.value()))
                    .filter(nlp_tasks::status.eq_any(allowed_sources)),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            if updated > 0 {
                return Ok(());
            }

            // Nothing matched: either the row is gone or its status forbids
            // the transition.
            let current = nlp_tasks::table
                .filter(nlp_tasks::id.eq(id.value()))
                .select(nlp_tasks::status)
                .first::<String>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            match current {
                None => Err(TaskRepositoryError::NotFound(id)),
                Some(status) => {
                    let from = TaskStatus::try_from(status.as_str())
                        .map_err(TaskRepositoryError::persistence)?;
                    Err(TaskDomainError::InvalidStatusTransition {
                        task_id: id,
                        from,
                        to: target,
                    }
                    .into())
                }
            }
        })
        .await
    }

    async fn delete_owned(&self, id: TaskId, owner_id: OwnerId) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                nlp_tasks::table
                    .filter(nlp_tasks::id.eq(id.value()))
                    .filter(nlp_tasks::user_id.eq(owner_id.value())),
            )
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn list_for_owner(
        &self,
        owner_id: OwnerId,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let row_limit = i64::try_from(limit).map_err(TaskRepositoryError::persistence)?;
        self.run_blocking(move |connection| {
            let rows = nlp_tasks::table
                .filter(nlp_tasks::user_id.eq(owner_id.value()))
                .order((nlp_tasks::created_at.desc(), nlp_tasks::id.desc()))
                .limit(row_limit)
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_new_row(draft: &TaskDraft, created_at: DateTime<Utc>) -> NewTaskRow {
    NewTaskRow {
        user_id: draft.owner_id().value(),
        title: draft.title().to_owned(),
        description: draft.description().to_owned(),
        task_type: draft.task_type().as_str().to_owned(),
        input_data: draft.input().to_owned(),
        priority: draft.priority().as_str().to_owned(),
        agent_config: draft.agent_config().map(str::to_owned),
        status: TaskStatus::Pending.as_str().to_owned(),
        created_at,
        updated_at: created_at,
    }
}

fn to_changeset(update: &TaskUpdate) -> TaskRepositoryResult<TaskLifecycleChangeset> {
    let processing_time = update
        .processing_time_ms()
        .map(i64::try_from)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;

    Ok(TaskLifecycleChangeset {
        status: update.status().as_str().to_owned(),
        output_data: update.output().clone().into_nullable(),
        error_message: update.error_message().clone().into_nullable(),
        processing_time,
        completed_at: update.completed_at().clone().into_nullable(),
        updated_at: update.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        user_id,
        title,
        description,
        task_type,
        input_data,
        priority,
        agent_config,
        status,
        output_data,
        error_message,
        processing_time,
        completed_at,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::new(id)?,
        owner_id: OwnerId::new(user_id)?,
        title,
        description,
        task_type: stored_task_type(id, &task_type),
        input: input_data,
        priority: TaskPriority::try_from(priority.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        agent_config,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence)?,
        output: output_data,
        error_message,
        processing_time_ms: processing_time
            .map(u64::try_from)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?,
        completed_at,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn stored_task_type(id: i64, name: &str) -> TaskType {
    if TaskType::try_from(name).is_err() {
        warn!(task_id = id, task_type = name, "unrecognized stored task type, using custom");
    }
    TaskType::from_name_or_custom(name)
}
