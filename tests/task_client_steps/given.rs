//! Given steps for task client BDD scenarios.

use super::world::{TaskClientWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use tasx::task::{domain::StatusLifecycle, services::CreateTaskRequest};

#[given("an empty task store")]
fn empty_task_store(world: &mut TaskClientWorld) {
    *world = TaskClientWorld::default();
}

#[given(r#"an empty task store using the "{lifecycle}" lifecycle"#)]
fn empty_task_store_with_lifecycle(
    world: &mut TaskClientWorld,
    lifecycle: String,
) -> Result<(), eyre::Report> {
    let parsed = StatusLifecycle::try_from(lifecycle.as_str())
        .map_err(|err| eyre::eyre!("invalid lifecycle in scenario: {err}"))?;
    *world = TaskClientWorld::new(parsed);
    Ok(())
}

#[given(r#"a task titled "{title}" exists"#)]
fn task_exists(world: &mut TaskClientWorld, title: String) -> Result<(), eyre::Report> {
    let created = run_async(world.client.create(CreateTaskRequest::new(title)))
        .wrap_err("create task for scenario setup")?;
    world.last_task = Some(created);
    Ok(())
}
