//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod log;
pub mod repository;

pub use log::{TaskLogRepository, TaskLogRepositoryError, TaskLogRepositoryResult};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
