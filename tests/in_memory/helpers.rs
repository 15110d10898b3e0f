//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use nlpforge::{
    provider::adapters::memory::ScriptedCompletionProvider,
    task::{
        adapters::memory::{InMemoryTaskLogRepository, InMemoryTaskRepository},
        domain::{Task, TaskType},
        services::{
            CreateTaskRequest, TaskExecutionService, TaskLifecycleError, TaskLifecycleService,
        },
    },
};
use rstest::fixture;

/// Lifecycle service wired to in-memory adapters.
pub type MemoryLifecycleService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryTaskLogRepository, DefaultClock>;

/// Execution service wired to in-memory adapters and a scripted provider.
pub type MemoryExecutionService = TaskExecutionService<
    InMemoryTaskRepository,
    InMemoryTaskLogRepository,
    ScriptedCompletionProvider,
    DefaultClock,
>;

/// Both services sharing one set of in-memory adapters.
pub struct Pipeline {
    /// Task creation and lookup.
    pub lifecycle: MemoryLifecycleService,
    /// Execution attempts.
    pub execution: MemoryExecutionService,
    /// Scripted provider shared with the execution service.
    pub provider: Arc<ScriptedCompletionProvider>,
}

/// Provides a fresh pipeline for each test.
#[fixture]
pub fn pipeline() -> Pipeline {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let logs = Arc::new(InMemoryTaskLogRepository::new());
    let provider = Arc::new(ScriptedCompletionProvider::new());
    let clock = Arc::new(DefaultClock);
    Pipeline {
        lifecycle: TaskLifecycleService::new(
            Arc::clone(&repository),
            Arc::clone(&logs),
            Arc::clone(&clock),
        ),
        execution: TaskExecutionService::new(repository, logs, Arc::clone(&provider), clock),
        provider,
    }
}

/// Creates a task owned by `owner` through the lifecycle service.
///
/// # Errors
///
/// Returns an error if validation or persistence fails.
pub async fn create_task(
    pipeline: &Pipeline,
    owner: i64,
    task_type: TaskType,
    input: &str,
) -> Result<Task, TaskLifecycleError> {
    pipeline
        .lifecycle
        .create(CreateTaskRequest::new(
            owner,
            format!("{task_type} task"),
            "Integration test task",
            task_type,
            input,
        ))
        .await
}
