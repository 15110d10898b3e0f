//! When steps for task execution BDD scenarios.

use super::world::{ExecutionWorld, run_async};
use nlpforge::task::services::ExecuteTaskRequest;
use rstest_bdd_macros::when;

#[when("the task is executed")]
fn execute_task(world: &mut ExecutionWorld) -> Result<(), eyre::Report> {
    let task_id = world.target()?;
    world.last_result = Some(run_async(
        world.service.execute(task_id, ExecuteTaskRequest::new()),
    ));
    Ok(())
}

#[when("that task is executed")]
fn execute_named_task(world: &mut ExecutionWorld) -> Result<(), eyre::Report> {
    execute_task(world)
}

#[when("the task is executed with streaming")]
fn stream_execute_task(world: &mut ExecutionWorld) -> Result<(), eyre::Report> {
    let task_id = world.target()?;
    world.last_result = Some(run_async(
        world
            .service
            .stream_execute(task_id, ExecuteTaskRequest::new()),
    ));
    Ok(())
}
