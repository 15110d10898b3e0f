//! In-memory adapters for task and execution-log persistence.

mod log;
mod task;

pub use log::InMemoryTaskLogRepository;
pub use task::InMemoryTaskRepository;
