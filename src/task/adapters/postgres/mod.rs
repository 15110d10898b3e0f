//! `PostgreSQL` adapters for task lifecycle and execution-log persistence.

mod log;
mod models;
mod repository;
mod schema;

pub use log::PostgresTaskLogRepository;
pub use repository::{PostgresTaskRepository, TaskPgPool};
