//! Then steps for task client BDD scenarios.

use super::world::{TaskClientWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use tasx::task::{
    domain::{TaskDomainError, TaskStatus},
    services::TaskClientError,
};

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskClientWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.current_task()?;

    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            task.status().as_str()
        ));
    }
    Ok(())
}

#[then("the task has no completion time")]
fn task_has_no_completion_time(world: &TaskClientWorld) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    if let Some(completed_at) = task.completed_at() {
        return Err(eyre::eyre!("expected no completion time, found {completed_at}"));
    }
    Ok(())
}

#[then("the task has a completion time")]
fn task_has_completion_time(world: &TaskClientWorld) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    if task.completed_at().is_none() {
        return Err(eyre::eyre!("expected a completion time"));
    }
    Ok(())
}

#[then("the task list has {count:usize} items")]
fn task_list_has(world: &TaskClientWorld, count: usize) -> Result<(), eyre::Report> {
    let tasks = run_async(world.client.list()).wrap_err("list tasks in scenario")?;
    if tasks.len() != count {
        return Err(eyre::eyre!("expected {count} tasks, found {}", tasks.len()));
    }
    Ok(())
}

#[then("the request fails with an empty title error")]
fn request_fails_with_empty_title(world: &TaskClientWorld) -> Result<(), eyre::Report> {
    let error = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing error in scenario world"))?;
    if !matches!(error, TaskClientError::Domain(TaskDomainError::EmptyTitle)) {
        return Err(eyre::eyre!("expected EmptyTitle error, got {error:?}"));
    }
    Ok(())
}
