//! Domain model for task lifecycle management.
//!
//! The task domain models task drafts, the execution status machine,
//! partial lifecycle updates, and the append-only execution log while
//! keeping all infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod kind;
mod log;
pub mod prompt;
mod status;
mod task;
mod update;

pub use error::{ParseTaskFieldError, TaskDomainError};
pub use ids::{OwnerId, TaskId, TaskLogId};
pub use kind::{TaskPriority, TaskType};
pub use log::TaskLogEntry;
pub use status::TaskStatus;
pub use task::{MAX_TITLE_CHARS, PersistedTaskData, Task, TaskDraft};
pub use update::{FieldChange, TaskUpdate};
