//! In-memory integration tests for execution attempts.

use super::helpers::{Pipeline, create_task, pipeline};
use nlpforge::provider::{
    adapters::memory::{FragmentStep, ScriptedReply},
    ports::ProviderError,
};
use nlpforge::task::{
    domain::{TaskStatus, TaskType},
    services::{ExecuteTaskRequest, TaskExecutionError},
};
use rstest::rstest;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_attempt_leaves_a_terminal_status(pipeline: Pipeline) -> Result<(), eyre::Report> {
    let task = create_task(&pipeline, 1, TaskType::Custom, "input").await?;
    pipeline.provider.push_reply(ScriptedReply::text("ok"))?;
    pipeline
        .provider
        .push_reply(ScriptedReply::Failure(ProviderError::upstream("rate limited")))?;
    pipeline
        .provider
        .push_reply(ScriptedReply::fragments(["a", "b"]))?;

    let outcomes = [
        pipeline
            .execution
            .execute(task.id(), ExecuteTaskRequest::new())
            .await
            .is_ok(),
        pipeline
            .execution
            .execute(task.id(), ExecuteTaskRequest::new())
            .await
            .is_ok(),
        pipeline
            .execution
            .stream_execute(task.id(), ExecuteTaskRequest::new())
            .await
            .is_ok(),
    ];

    eyre::ensure!(outcomes == [true, false, true], "unexpected outcomes {outcomes:?}");
    let stored = pipeline
        .lifecycle
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    eyre::ensure!(stored.status().is_terminal(), "status is not terminal");
    eyre::ensure!(stored.output() == Some("ab"), "unexpected output");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_stream_persists_failure(pipeline: Pipeline) -> Result<(), eyre::Report> {
    let task = create_task(&pipeline, 1, TaskType::CodeGeneration, "fn main").await?;
    pipeline.provider.push_reply(ScriptedReply::Fragments(vec![
        FragmentStep::Text("Par".to_owned()),
        FragmentStep::Text("tial".to_owned()),
        FragmentStep::Pause(Duration::from_secs(60)),
    ]))?;
    let token = CancellationToken::new();
    let canceller = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        })
    };

    let result = pipeline
        .execution
        .stream_execute_with_cancellation(task.id(), ExecuteTaskRequest::new(), token)
        .await;
    canceller.await?;

    eyre::ensure!(
        matches!(&result, Err(TaskExecutionError::Cancelled { partial }) if partial == "Partial"),
        "expected cancellation, got {result:?}"
    );
    let stored = pipeline
        .lifecycle
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    eyre::ensure!(stored.status() == TaskStatus::Failed, "task not failed");
    eyre::ensure!(stored.output().is_none(), "cancelled task kept output");
    eyre::ensure!(
        stored.error_message() == Some("execution cancelled"),
        "unexpected error message {:?}",
        stored.error_message()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stream_failure_before_first_fragment_fails_task(
    pipeline: Pipeline,
) -> Result<(), eyre::Report> {
    let task = create_task(&pipeline, 1, TaskType::Translation, "Hola").await?;
    pipeline.provider.push_reply(ScriptedReply::Failure(
        ProviderError::Configuration("no credentials".to_owned()),
    ))?;

    let result = pipeline
        .execution
        .stream_execute(task.id(), ExecuteTaskRequest::new())
        .await;

    eyre::ensure!(
        matches!(result, Err(TaskExecutionError::Provider(_))),
        "expected provider error"
    );
    let stored = pipeline
        .lifecycle
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    eyre::ensure!(
        stored.error_message() == Some("provider configuration error: no credentials"),
        "unexpected error message {:?}",
        stored.error_message()
    );
    Ok(())
}
