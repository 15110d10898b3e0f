//! In-memory integration tests for task creation, listing, and deletion.

use super::helpers::{Pipeline, create_task, pipeline};
use nlpforge::provider::adapters::memory::ScriptedReply;
use nlpforge::task::{
    domain::{OwnerId, TaskStatus, TaskType},
    services::{ExecuteTaskRequest, TaskLifecycleError},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_returns_only_the_owners_tasks_newest_first(
    pipeline: Pipeline,
) -> Result<(), eyre::Report> {
    let first = create_task(&pipeline, 1, TaskType::Research, "first").await?;
    let second = create_task(&pipeline, 1, TaskType::Analysis, "second").await?;
    create_task(&pipeline, 2, TaskType::Custom, "someone else").await?;
    let owner = OwnerId::new(1)?;

    let listed = pipeline.lifecycle.list_for_owner(owner, None).await?;

    let ids: Vec<_> = listed.iter().map(|task| task.id()).collect();
    eyre::ensure!(ids.len() == 2, "expected two tasks, found {}", ids.len());
    eyre::ensure!(
        ids.contains(&first.id()) && ids.contains(&second.id()),
        "listing is missing an owned task"
    );
    eyre::ensure!(
        listed
            .windows(2)
            .all(|pair| match pair {
                [newer, older] => newer.created_at() >= older.created_at(),
                _ => true,
            }),
        "listing is not newest first"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_task_cannot_be_executed(pipeline: Pipeline) -> Result<(), eyre::Report> {
    let task = create_task(&pipeline, 4, TaskType::Custom, "to be removed").await?;

    let removed = pipeline.lifecycle.delete(task.id(), task.owner_id()).await?;
    let result = pipeline
        .execution
        .execute(task.id(), ExecuteTaskRequest::new())
        .await;

    eyre::ensure!(removed, "owner should be able to delete the task");
    eyre::ensure!(
        matches!(
            result,
            Err(nlpforge::task::services::TaskExecutionError::NotFound(_))
        ),
        "expected not found, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn execution_log_is_retrievable_through_lifecycle_service(
    pipeline: Pipeline,
) -> Result<(), eyre::Report> {
    let task = create_task(&pipeline, 1, TaskType::Summarization, "Long report").await?;
    pipeline.provider.push_reply(ScriptedReply::text("Short"))?;
    pipeline
        .execution
        .execute(task.id(), ExecuteTaskRequest::new())
        .await?;

    let entries = pipeline.lifecycle.logs_for_task(task.id()).await?;
    let stored = pipeline
        .lifecycle
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;

    eyre::ensure!(stored.status() == TaskStatus::Completed, "task not completed");
    eyre::ensure!(entries.len() == 2, "expected two log entries");
    eyre::ensure!(
        entries
            .windows(2)
            .all(|pair| match pair {
                [earlier, later] => earlier.created_at() <= later.created_at(),
                _ => true,
            }),
        "log entries are not chronological"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creation_rejects_blank_input(pipeline: Pipeline) {
    let result = create_task(&pipeline, 1, TaskType::Custom, "   ").await;

    assert!(matches!(result, Err(TaskLifecycleError::Domain(_))));
}
