//! Given steps for task execution BDD scenarios.

use super::world::{ExecutionWorld, run_async};
use chrono::Utc;
use eyre::WrapErr;
use nlpforge::{
    provider::{adapters::memory::ScriptedReply, ports::ProviderError},
    task::{
        domain::{OwnerId, TaskDraft, TaskId, TaskType},
        ports::TaskRepository,
    },
};
use rstest_bdd_macros::given;

#[given(r#"a pending "{task_type}" task with input "{input}""#)]
fn a_pending_task(
    world: &mut ExecutionWorld,
    task_type: String,
    input: String,
) -> Result<(), eyre::Report> {
    let kind = TaskType::try_from(task_type.as_str()).wrap_err("parse scenario task type")?;
    let owner = OwnerId::new(1).wrap_err("build scenario owner")?;
    let draft = TaskDraft::new(owner, "Scenario task", "Scenario description", kind, input)
        .wrap_err("build scenario draft")?;
    let task = run_async(world.repository.create(&draft, Utc::now()))
        .wrap_err("store scenario task")?;
    world.task_id = Some(task.id());
    Ok(())
}

#[given(r#"the provider replies with "{text}""#)]
fn provider_replies_with(world: &mut ExecutionWorld, text: String) -> Result<(), eyre::Report> {
    world
        .provider
        .push_reply(ScriptedReply::text(text))
        .wrap_err("queue scripted reply")
}

#[given(r#"the provider fails with "{message}""#)]
fn provider_fails_with(world: &mut ExecutionWorld, message: String) -> Result<(), eyre::Report> {
    world
        .provider
        .push_reply(ScriptedReply::Failure(ProviderError::upstream(message)))
        .wrap_err("queue scripted failure")
}

#[given(r#"the provider streams the fragments "{pieces}""#)]
fn provider_streams_fragments(
    world: &mut ExecutionWorld,
    pieces: String,
) -> Result<(), eyre::Report> {
    world
        .provider
        .push_reply(ScriptedReply::fragments(pieces.split('|')))
        .wrap_err("queue scripted fragments")
}

#[given("no task with id {id:i64}")]
fn no_task_with_id(world: &mut ExecutionWorld, id: i64) -> Result<(), eyre::Report> {
    world.task_id = Some(TaskId::new(id).wrap_err("build scenario task id")?);
    Ok(())
}
