//! Shared world state for task client BDD scenarios.

use std::sync::Arc;
use std::time::Duration;

use mockable::DefaultClock;
use rstest::fixture;
use tasx::task::{
    adapters::local::{InMemoryStorage, LocalStoreConfig, LocalTaskStore},
    domain::{StatusLifecycle, Task},
    services::{TaskClient, TaskClientError},
};

/// Store type used by the BDD world.
pub type TestStore = LocalTaskStore<InMemoryStorage, DefaultClock>;

/// Scenario world for task client behaviour tests.
pub struct TaskClientWorld {
    pub client: TaskClient<TestStore>,
    pub last_task: Option<Task>,
    pub last_error: Option<TaskClientError>,
}

impl TaskClientWorld {
    /// Creates a world over an unseeded, zero-latency store.
    #[must_use]
    pub fn new(lifecycle: StatusLifecycle) -> Self {
        let config = LocalStoreConfig::default()
            .with_latency(Duration::ZERO)
            .with_seed_examples(false);
        let store = LocalTaskStore::open(
            Arc::new(InMemoryStorage::new()),
            Arc::new(DefaultClock),
            config,
        )
        .expect("in-memory store opens");

        Self {
            client: TaskClient::new(Arc::new(store), lifecycle),
            last_task: None,
            last_error: None,
        }
    }

    /// Returns the task most recently produced by a step.
    pub fn current_task(&self) -> Result<&Task, eyre::Report> {
        self.last_task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for TaskClientWorld {
    fn default() -> Self {
        Self::new(StatusLifecycle::default())
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskClientWorld {
    TaskClientWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
