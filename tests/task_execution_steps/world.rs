//! Shared world state for task execution BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use nlpforge::{
    provider::adapters::memory::ScriptedCompletionProvider,
    task::{
        adapters::memory::{InMemoryTaskLogRepository, InMemoryTaskRepository},
        domain::TaskId,
        services::{ExecutionReport, TaskExecutionResult, TaskExecutionService},
    },
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestExecutionService = TaskExecutionService<
    InMemoryTaskRepository,
    InMemoryTaskLogRepository,
    ScriptedCompletionProvider,
    DefaultClock,
>;

/// Scenario world for task execution behaviour tests.
pub struct ExecutionWorld {
    /// Task store shared with the service.
    pub repository: Arc<InMemoryTaskRepository>,
    /// Execution log shared with the service.
    pub logs: Arc<InMemoryTaskLogRepository>,
    /// Scripted provider shared with the service.
    pub provider: Arc<ScriptedCompletionProvider>,
    /// The execution service under test.
    pub service: TestExecutionService,
    /// Task targeted by the scenario.
    pub task_id: Option<TaskId>,
    /// Result of the last execution attempt.
    pub last_result: Option<TaskExecutionResult<ExecutionReport>>,
}

impl ExecutionWorld {
    /// Creates a world with empty stores and no queued replies.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryTaskRepository::new());
        let logs = Arc::new(InMemoryTaskLogRepository::new());
        let provider = Arc::new(ScriptedCompletionProvider::new());
        let service = TaskExecutionService::new(
            Arc::clone(&repository),
            Arc::clone(&logs),
            Arc::clone(&provider),
            Arc::new(DefaultClock),
        );
        Self {
            repository,
            logs,
            provider,
            service,
            task_id: None,
            last_result: None,
        }
    }

    /// Returns the scenario's target task id.
    ///
    /// # Errors
    ///
    /// Returns an error when no step has chosen a task yet.
    pub fn target(&self) -> Result<TaskId, eyre::Report> {
        self.task_id
            .ok_or_else(|| eyre::eyre!("no task selected in scenario world"))
    }
}

impl Default for ExecutionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ExecutionWorld {
    ExecutionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
