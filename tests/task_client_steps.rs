//! Behaviour tests for the task client lifecycle.

#[path = "task_client_steps/mod.rs"]
mod task_client_steps_defs;

use rstest_bdd_macros::scenario;
use task_client_steps_defs::world::{TaskClientWorld, world};

#[scenario(path = "tests/features/task_client.feature", name = "Create a task")]
#[tokio::test(flavor = "multi_thread")]
async fn create_a_task(world: TaskClientWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/task_client.feature", name = "Start a pending task")]
#[tokio::test(flavor = "multi_thread")]
async fn start_a_pending_task(world: TaskClientWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_client.feature",
    name = "Complete a task in the two-state lifecycle"
)]
#[tokio::test(flavor = "multi_thread")]
async fn complete_in_two_state_lifecycle(world: TaskClientWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/task_client.feature", name = "Delete a task")]
#[tokio::test(flavor = "multi_thread")]
async fn delete_a_task(world: TaskClientWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/task_client.feature", name = "Reject a blank title")]
#[tokio::test(flavor = "multi_thread")]
async fn reject_a_blank_title(world: TaskClientWorld) {
    let _ = world;
}
