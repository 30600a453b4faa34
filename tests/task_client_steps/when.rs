//! When steps for task client BDD scenarios.

use super::world::{TaskClientWorld, run_async};
use rstest_bdd_macros::when;
use tasx::task::services::CreateTaskRequest;

#[when(r#"a task titled "{title}" is created"#)]
fn create_task(world: &mut TaskClientWorld, title: String) {
    match run_async(world.client.create(CreateTaskRequest::new(title))) {
        Ok(created) => world.last_task = Some(created),
        Err(err) => world.last_error = Some(err),
    }
}

#[when("the task status is advanced")]
fn advance_task(world: &mut TaskClientWorld) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    let result = run_async(world.client.update_status(task.id(), task.status()));
    match result {
        Ok(updated) => world.last_task = Some(updated),
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}

#[when("the task is deleted")]
fn delete_task(world: &mut TaskClientWorld) -> Result<(), eyre::Report> {
    let id = world.current_task()?.id();
    if let Err(err) = run_async(world.client.delete(id)) {
        world.last_error = Some(err);
    }
    Ok(())
}
