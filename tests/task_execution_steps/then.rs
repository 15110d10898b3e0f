//! Then steps for task execution BDD scenarios.

use super::world::{ExecutionWorld, run_async};
use nlpforge::task::{
    domain::Task,
    ports::{TaskLogRepository, TaskRepository},
    services::TaskExecutionError,
};
use rstest_bdd_macros::then;

fn stored_task(world: &ExecutionWorld) -> Result<Task, eyre::Report> {
    let task_id = world.target()?;
    run_async(world.repository.find_by_id(task_id))
        .map_err(|err| eyre::eyre!("task lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("task {task_id} is missing from the store"))
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &mut ExecutionWorld, status: String) -> Result<(), eyre::Report> {
    let task = stored_task(world)?;
    eyre::ensure!(
        task.status().as_str() == status,
        "expected status {status}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"the task output is "{output}""#)]
fn task_output_is(world: &mut ExecutionWorld, output: String) -> Result<(), eyre::Report> {
    let task = stored_task(world)?;
    eyre::ensure!(
        task.output() == Some(output.as_str()),
        "expected output {output:?}, found {:?}",
        task.output()
    );
    Ok(())
}

#[then(r#"the task error is "{message}""#)]
fn task_error_is(world: &mut ExecutionWorld, message: String) -> Result<(), eyre::Report> {
    let task = stored_task(world)?;
    eyre::ensure!(
        task.error_message() == Some(message.as_str()),
        "expected error {message:?}, found {:?}",
        task.error_message()
    );
    Ok(())
}

#[then("the task has no output")]
fn task_has_no_output(world: &mut ExecutionWorld) -> Result<(), eyre::Report> {
    let task = stored_task(world)?;
    eyre::ensure!(task.output().is_none(), "failed task kept output");
    eyre::ensure!(task.completed_at().is_none(), "failed task has a completion time");
    Ok(())
}

#[then("the execution log has {count:usize} entries")]
fn execution_log_has(world: &mut ExecutionWorld, count: usize) -> Result<(), eyre::Report> {
    let task_id = world.target()?;
    let entries = run_async(world.logs.list_for_task(task_id))
        .map_err(|err| eyre::eyre!("log lookup failed: {err}"))?;
    eyre::ensure!(
        entries.len() == count,
        "expected {count} log entries, found {}",
        entries.len()
    );
    Ok(())
}

#[then("execution fails with a not-found error")]
fn execution_fails_not_found(world: &mut ExecutionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing execution result in scenario world"))?;
    eyre::ensure!(
        matches!(result, Err(TaskExecutionError::NotFound(_))),
        "expected not-found error, got {result:?}"
    );
    Ok(())
}

#[then("no task has been stored")]
fn no_task_stored(world: &mut ExecutionWorld) -> Result<(), eyre::Report> {
    let empty = world
        .repository
        .is_empty()
        .map_err(|err| eyre::eyre!("store inspection failed: {err}"))?;
    eyre::ensure!(empty, "expected an empty task store");
    Ok(())
}
