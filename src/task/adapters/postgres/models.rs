//! Diesel row models for task and execution-log persistence.

use super::schema::{nlp_tasks, task_logs};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = nlp_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Owning user identifier.
    pub user_id: i64,
    /// Task title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Task type.
    pub task_type: String,
    /// Input text.
    pub input_data: String,
    /// Task priority.
    pub priority: String,
    /// Optional agent-configuration reference.
    pub agent_config: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Output of the latest successful attempt.
    pub output_data: Option<String>,
    /// Error of the latest failed attempt.
    pub error_message: Option<String>,
    /// Duration of the latest finished attempt, in milliseconds.
    pub processing_time: Option<i64>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = nlp_tasks)]
pub struct NewTaskRow {
    /// Owning user identifier.
    pub user_id: i64,
    /// Task title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Task type.
    pub task_type: String,
    /// Input text.
    pub input_data: String,
    /// Task priority.
    pub priority: String,
    /// Optional agent-configuration reference.
    pub agent_config: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Partial update of task lifecycle columns.
///
/// Outer `None` leaves a column untouched; `Some(None)` writes `NULL`.
#[derive(Debug, Clone, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = nlp_tasks)]
pub struct TaskLifecycleChangeset {
    /// Lifecycle status.
    pub status: String,
    /// Output change.
    pub output_data: Option<Option<String>>,
    /// Error change.
    pub error_message: Option<Option<String>>,
    /// Processing time change.
    pub processing_time: Option<i64>,
    /// Completion timestamp change.
    pub completed_at: Option<Option<DateTime<Utc>>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for execution log entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskLogRow {
    /// Entry identifier.
    pub id: i64,
    /// Task identifier.
    pub task_id: i64,
    /// Log message.
    pub message: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for execution log entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_logs)]
pub struct NewTaskLogRow {
    /// Task identifier.
    pub task_id: i64,
    /// Log message.
    pub message: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
