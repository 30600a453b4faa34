//! Task store persisted as a single serialized collection.

use super::storage::KeyValueStorage;
use crate::task::{
    domain::{NewTask, PersistedTaskData, Task, TaskId, TaskStatus},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use mockable::Clock;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

/// Settings for [`LocalTaskStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStoreConfig {
    /// Key holding the JSON array of tasks.
    pub tasks_key: String,
    /// Key holding the next identifier to allocate.
    pub id_key: String,
    /// Artificial delay applied before every operation.
    pub latency: Duration,
    /// Seeds example tasks when the collection is empty on open.
    pub seed_examples: bool,
}

impl LocalStoreConfig {
    /// Default key for the task collection.
    pub const DEFAULT_TASKS_KEY: &'static str = "tasx_tasks";
    /// Default key for the identifier counter.
    pub const DEFAULT_ID_KEY: &'static str = "tasx_id_counter";
    /// Default artificial delay.
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

    /// Sets the artificial delay.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Enables or disables example seeding.
    #[must_use]
    pub const fn with_seed_examples(mut self, seed_examples: bool) -> Self {
        self.seed_examples = seed_examples;
        self
    }
}

impl Default for LocalStoreConfig {
    fn default() -> Self {
        Self {
            tasks_key: Self::DEFAULT_TASKS_KEY.to_owned(),
            id_key: Self::DEFAULT_ID_KEY.to_owned(),
            latency: Self::DEFAULT_LATENCY,
            seed_examples: true,
        }
    }
}

/// Local stand-in for the task API.
///
/// Tasks are kept newest first. Each operation loads the whole collection,
/// applies the change, and writes it back while holding the store lock.
pub struct LocalTaskStore<K, C>
where
    K: KeyValueStorage,
    C: Clock + Send + Sync,
{
    storage: Arc<K>,
    clock: Arc<C>,
    config: LocalStoreConfig,
    lock: Mutex<()>,
}

impl<K, C> LocalTaskStore<K, C>
where
    K: KeyValueStorage,
    C: Clock + Send + Sync,
{
    /// Opens the store, seeding examples if configured and the collection is
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError`] when the existing collection cannot be read
    /// or the seed cannot be written.
    pub fn open(
        storage: Arc<K>,
        clock: Arc<C>,
        config: LocalStoreConfig,
    ) -> TaskStoreResult<Self> {
        let store = Self {
            storage,
            clock,
            config,
            lock: Mutex::new(()),
        };
        if store.config.seed_examples {
            store.seed_if_empty()?;
        }
        Ok(store)
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &LocalStoreConfig {
        &self.config
    }

    fn guard(&self) -> TaskStoreResult<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|err| TaskStoreError::persistence(io::Error::other(err.to_string())))
    }

    async fn simulate_latency(&self) {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
    }

    fn load(&self) -> TaskStoreResult<Vec<Task>> {
        let Some(raw) = self.storage.get(&self.config.tasks_key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|err| TaskStoreError::Serialization(err.to_string()))
    }

    fn save(&self, tasks: &[Task]) -> TaskStoreResult<()> {
        let raw = serde_json::to_string(tasks)
            .map_err(|err| TaskStoreError::Serialization(err.to_string()))?;
        self.storage.set(&self.config.tasks_key, &raw)
    }

    /// Reads the next unallocated identifier without consuming it.
    fn peek_id(&self) -> TaskStoreResult<TaskId> {
        match self.storage.get(&self.config.id_key)? {
            Some(raw) => raw.trim().parse::<u64>().map(TaskId::new).map_err(|err| {
                TaskStoreError::Serialization(format!("invalid id counter '{raw}': {err}"))
            }),
            None => Ok(TaskId::new(1)),
        }
    }

    /// Records `last` as used. Called only after the collection is saved, so
    /// a failed save leaves the counter untouched.
    fn commit_id(&self, last: TaskId) -> TaskStoreResult<()> {
        let following = id_after(last)?;
        self.storage
            .set(&self.config.id_key, &following.value().to_string())
    }

    fn seed_if_empty(&self) -> TaskStoreResult<()> {
        let _guard = self.guard()?;
        if !self.load()?.is_empty() {
            return Ok(());
        }
        let now = self.clock.utc();
        let mut id = self.peek_id()?;
        let mut seeded = Vec::with_capacity(SEED_TASKS.len());
        for &(title, description, status) in &SEED_TASKS {
            seeded.push(Task::from_persisted(PersistedTaskData {
                id,
                title: title.to_owned(),
                description: description.map(str::to_owned),
                status,
                created_at: now,
                completed_at: status.is_terminal().then_some(now),
            }));
            id = id_after(id)?;
        }
        self.save(&seeded)?;
        if let Some(last) = seeded.last() {
            self.commit_id(last.id())?;
        }
        info!(count = seeded.len(), "seeded local task store with examples");
        Ok(())
    }
}

fn id_after(id: TaskId) -> TaskStoreResult<TaskId> {
    id.value()
        .checked_add(1)
        .map(TaskId::new)
        .ok_or_else(|| TaskStoreError::Serialization("id counter overflow".to_owned()))
}

const SEED_TASKS: [(&str, Option<&str>, TaskStatus); 6] = [
    ("Buy coffee beans", Some("Arabica 250g"), TaskStatus::Pending),
    ("Wireframe home page", Some("Figma draft v2"), TaskStatus::InProgress),
    ("Submit expense report", None, TaskStatus::Done),
    ("Book dentist appointment", Some("Before end of month"), TaskStatus::Pending),
    ("Review pricing page copy", Some("Marketing draft"), TaskStatus::InProgress),
    ("Renew domain", None, TaskStatus::Done),
];

#[async_trait]
impl<K, C> TaskStore for LocalTaskStore<K, C>
where
    K: KeyValueStorage,
    C: Clock + Send + Sync,
{
    async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        self.simulate_latency().await;
        let _guard = self.guard()?;
        self.load()
    }

    async fn create(&self, new_task: &NewTask) -> TaskStoreResult<Task> {
        self.simulate_latency().await;
        let _guard = self.guard()?;
        let mut tasks = self.load()?;
        let task = Task::create(self.peek_id()?, new_task.clone(), &*self.clock);
        tasks.insert(0, task.clone());
        self.save(&tasks)?;
        self.commit_id(task.id())?;
        debug!(task_id = %task.id(), "created local task");
        Ok(task)
    }

    async fn set_status(&self, id: TaskId, status: TaskStatus) -> TaskStoreResult<Task> {
        self.simulate_latency().await;
        let _guard = self.guard()?;
        let mut tasks = self.load()?;
        let task = tasks
            .iter_mut()
            .find(|candidate| candidate.id() == id)
            .ok_or(TaskStoreError::NotFound(id))?;
        task.set_status(status, &*self.clock);
        let updated = task.clone();
        self.save(&tasks)?;
        debug!(task_id = %id, status = status.as_str(), "updated local task status");
        Ok(updated)
    }

    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        self.simulate_latency().await;
        let _guard = self.guard()?;
        let mut tasks = self.load()?;
        let before = tasks.len();
        tasks.retain(|candidate| candidate.id() != id);
        if tasks.len() != before {
            self.save(&tasks)?;
            debug!(task_id = %id, "deleted local task");
        }
        Ok(())
    }
}
