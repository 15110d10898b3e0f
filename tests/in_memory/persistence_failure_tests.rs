//! Execution behaviour when the record store fails, using mocked ports.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use mockall::mock;
use nlpforge::provider::adapters::memory::{ScriptedCompletionProvider, ScriptedReply};
use nlpforge::task::{
    adapters::memory::{InMemoryTaskLogRepository, InMemoryTaskRepository},
    domain::{
        OwnerId, Task, TaskDraft, TaskId, TaskLogEntry, TaskStatus, TaskType, TaskUpdate,
    },
    ports::{
        TaskLogRepository, TaskLogRepositoryError, TaskLogRepositoryResult, TaskRepository,
        TaskRepositoryError, TaskRepositoryResult,
    },
    services::{ExecuteTaskRequest, TaskExecutionError, TaskExecutionService},
};
use rstest::{fixture, rstest};

mock! {
    pub Tasks {}

    #[async_trait]
    impl TaskRepository for Tasks {
        async fn create(
            &self,
            draft: &TaskDraft,
            created_at: DateTime<Utc>,
        ) -> TaskRepositoryResult<Task>;
        async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;
        async fn update(&self, id: TaskId, update: &TaskUpdate) -> TaskRepositoryResult<()>;
        async fn delete_owned(&self, id: TaskId, owner_id: OwnerId) -> TaskRepositoryResult<bool>;
        async fn list_for_owner(
            &self,
            owner_id: OwnerId,
            limit: usize,
        ) -> TaskRepositoryResult<Vec<Task>>;
    }
}

mock! {
    pub Logs {}

    #[async_trait]
    impl TaskLogRepository for Logs {
        async fn append(
            &self,
            task_id: TaskId,
            message: &str,
            created_at: DateTime<Utc>,
        ) -> TaskLogRepositoryResult<TaskLogEntry>;
        async fn list_for_task(&self, task_id: TaskId) -> TaskLogRepositoryResult<Vec<TaskLogEntry>>;
    }
}

#[fixture]
fn seeded_task() -> Task {
    let owner = OwnerId::new(1).expect("owner id should be valid");
    let id = TaskId::new(1).expect("task id should be valid");
    TaskDraft::new(owner, "Mocked", "description", TaskType::Custom, "input")
        .expect("draft should be valid")
        .into_task(id, Utc::now())
}

fn scripted(reply: ScriptedReply) -> Arc<ScriptedCompletionProvider> {
    let provider = ScriptedCompletionProvider::new();
    provider.push_reply(reply).expect("reply should queue");
    Arc::new(provider)
}

fn store_failure() -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other("connection refused"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_completion_write_is_reported_as_persistence_error(seeded_task: Task) {
    let mut tasks = MockTasks::new();
    let found = seeded_task.clone();
    tasks
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    tasks
        .expect_update()
        .withf(|_, update| update.status() == TaskStatus::Processing)
        .times(1)
        .returning(|_, _| Ok(()));
    tasks
        .expect_update()
        .withf(|_, update| update.status() == TaskStatus::Completed)
        .times(1)
        .returning(|_, _| Err(store_failure()));
    let service = TaskExecutionService::new(
        Arc::new(tasks),
        Arc::new(InMemoryTaskLogRepository::new()),
        scripted(ScriptedReply::text("Summary text")),
        Arc::new(DefaultClock),
    );

    let result = service
        .execute(seeded_task.id(), ExecuteTaskRequest::new())
        .await;

    assert!(matches!(
        result,
        Err(TaskExecutionError::Persistence(TaskRepositoryError::Persistence(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_start_write_skips_the_provider(seeded_task: Task) {
    let mut tasks = MockTasks::new();
    let found = seeded_task.clone();
    tasks
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    tasks
        .expect_update()
        .times(1)
        .returning(|_, _| Err(store_failure()));
    let provider = scripted(ScriptedReply::text("unused"));
    let service = TaskExecutionService::new(
        Arc::new(tasks),
        Arc::new(InMemoryTaskLogRepository::new()),
        Arc::clone(&provider),
        Arc::new(DefaultClock),
    );

    let result = service
        .execute(seeded_task.id(), ExecuteTaskRequest::new())
        .await;

    assert!(matches!(result, Err(TaskExecutionError::Persistence(_))));
    assert!(provider.calls().expect("calls should be readable").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn log_write_failures_do_not_fail_the_attempt() {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let owner = OwnerId::new(1).expect("owner id should be valid");
    let draft = TaskDraft::new(owner, "Logged", "description", TaskType::Custom, "input")
        .expect("draft should be valid");
    let task = repository
        .create(&draft, Utc::now())
        .await
        .expect("task should be stored");
    let mut logs = MockLogs::new();
    logs.expect_append().times(2).returning(|_, _, _| {
        Err(TaskLogRepositoryError::persistence(std::io::Error::other(
            "log table locked",
        )))
    });
    let service = TaskExecutionService::new(
        Arc::clone(&repository),
        Arc::new(logs),
        scripted(ScriptedReply::text("done")),
        Arc::new(DefaultClock),
    );

    let report = service
        .execute(task.id(), ExecuteTaskRequest::new())
        .await
        .expect("execution should succeed");

    assert_eq!(report.result(), "done");
    let stored = repository
        .find_by_id(task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(stored.status(), TaskStatus::Completed);
}
