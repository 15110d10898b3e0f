//! Application services for task lifecycle orchestration.

mod execution;
mod lifecycle;
mod locks;
mod recorder;

pub use execution::{
    CANCELLED_MESSAGE, ExecuteTaskRequest, ExecutionReport, TaskExecutionError,
    TaskExecutionResult, TaskExecutionService,
};
pub use lifecycle::{
    CreateTaskRequest, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, TaskLifecycleError,
    TaskLifecycleResult, TaskLifecycleService,
};
pub use recorder::ExecutionLogRecorder;
