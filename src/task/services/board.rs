//! Task board: cached task list and mutation bookkeeping for a front-end.
//!
//! Mutations merge the record returned by the store into the cached list
//! rather than re-fetching the whole collection. Every mutation outcome is
//! reported as a [`Notice`].

use super::client::{CreateTaskRequest, TaskClient, TaskClientError};
use crate::task::{
    domain::{StatusAction, Task, TaskId},
    ports::{TaskStore, TaskStoreError},
};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::warn;

/// State of the cached task list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No load has been requested yet.
    #[default]
    Idle,
    /// A load is in flight.
    Loading,
    /// The cache holds the latest list.
    Loaded,
    /// The last load failed with the given message.
    Failed(String),
}

/// The mutation currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingMutation {
    /// A task is being created.
    Create,
    /// A task status is being advanced.
    Update(TaskId),
    /// A task is being deleted.
    Delete(TaskId),
}

impl PendingMutation {
    /// Returns the task the mutation targets, if any.
    #[must_use]
    pub const fn task_id(self) -> Option<TaskId> {
        match self {
            Self::Create => None,
            Self::Update(id) | Self::Delete(id) => Some(id),
        }
    }
}

impl fmt::Display for PendingMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Update(id) => write!(f, "update of task {id}"),
            Self::Delete(id) => write!(f, "delete of task {id}"),
        }
    }
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    /// The mutation succeeded.
    Success,
    /// Informational outcome.
    Info,
    /// The mutation failed.
    Error,
}

/// User-facing outcome of a board mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Outcome severity.
    pub severity: NoticeSeverity,
    /// Short message.
    pub message: String,
    /// Underlying error text for failures.
    pub detail: Option<String>,
}

impl Notice {
    fn success(message: &str) -> Self {
        Self {
            severity: NoticeSeverity::Success,
            message: message.to_owned(),
            detail: None,
        }
    }

    fn info(message: &str) -> Self {
        Self {
            severity: NoticeSeverity::Info,
            message: message.to_owned(),
            detail: None,
        }
    }

    fn failure(message: &str, err: &TaskBoardError) -> Self {
        Self {
            severity: NoticeSeverity::Error,
            message: message.to_owned(),
            detail: Some(err.to_string()),
        }
    }

    /// Returns `true` for error notices.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == NoticeSeverity::Error
    }
}

/// Errors raised by board operations.
#[derive(Debug, Error)]
pub enum TaskBoardError {
    /// Another mutation is still in flight.
    #[error("another change is in progress: {0}")]
    Busy(PendingMutation),
    /// The task is not in the cached list.
    #[error("task not found: {0}")]
    UnknownTask(TaskId),
    /// The client operation failed.
    #[error(transparent)]
    Client(#[from] TaskClientError),
}

/// Result type for task board operations.
pub type TaskBoardResult<T> = Result<T, TaskBoardError>;

#[derive(Debug, Default)]
struct BoardState {
    tasks: Vec<Task>,
    load_state: LoadState,
    pending: Option<PendingMutation>,
}

/// Cached view of the task collection.
///
/// Clones share the same cache, so handlers running concurrently observe the
/// same in-flight mutation and are rejected with [`TaskBoardError::Busy`].
#[derive(Debug)]
pub struct TaskBoard<S>
where
    S: TaskStore,
{
    client: TaskClient<S>,
    state: Arc<RwLock<BoardState>>,
}

impl<S> Clone for TaskBoard<S>
where
    S: TaskStore,
{
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

/// Clears the pending mutation when dropped.
struct PendingGuard<'a> {
    state: &'a RwLock<BoardState>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .pending = None;
    }
}

impl<S> TaskBoard<S>
where
    S: TaskStore,
{
    /// Creates an empty board over `client`.
    #[must_use]
    pub fn new(client: TaskClient<S>) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(BoardState::default())),
        }
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &TaskClient<S> {
        &self.client
    }

    fn read(&self) -> RwLockReadGuard<'_, BoardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BoardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a snapshot of the cached tasks.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.read().tasks.clone()
    }

    /// Returns the cached task with `id`, if present.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.read().tasks.iter().find(|task| task.id() == id).cloned()
    }

    /// Returns the number of cached tasks.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.read().tasks.len()
    }

    /// Returns the load state of the cache.
    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.read().load_state.clone()
    }

    /// Returns the mutation in flight, if any.
    #[must_use]
    pub fn pending(&self) -> Option<PendingMutation> {
        self.read().pending
    }

    /// Returns `true` when no mutation is in flight.
    #[must_use]
    pub fn can_mutate(&self) -> bool {
        self.pending().is_none()
    }

    /// Returns `true` while a mutation targeting `id` is in flight.
    #[must_use]
    pub fn is_mutating(&self, id: TaskId) -> bool {
        self.pending().and_then(PendingMutation::task_id) == Some(id)
    }

    /// Returns the status action offered for the cached task `id`.
    #[must_use]
    pub fn action_for(&self, id: TaskId) -> Option<StatusAction> {
        self.task(id)
            .and_then(|task| self.client.lifecycle().action(task.status()))
    }

    /// Reloads the cached list from the store.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Client`] when the list cannot be loaded; the
    /// load state is set to [`LoadState::Failed`] and the previous cache is
    /// kept.
    pub async fn refresh(&self) -> TaskBoardResult<()> {
        self.write().load_state = LoadState::Loading;
        match self.client.list().await {
            Ok(tasks) => {
                let mut state = self.write();
                state.tasks = tasks;
                state.load_state = LoadState::Loaded;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load tasks");
                self.write().load_state = LoadState::Failed(err.to_string());
                Err(err.into())
            }
        }
    }

    fn begin(&self, mutation: PendingMutation) -> TaskBoardResult<PendingGuard<'_>> {
        let mut state = self.write();
        if let Some(current) = state.pending {
            return Err(TaskBoardError::Busy(current));
        }
        state.pending = Some(mutation);
        Ok(PendingGuard { state: &self.state })
    }

    /// Creates a task and prepends it to the cache.
    pub async fn submit(&self, request: CreateTaskRequest) -> Notice {
        match self.try_submit(request).await {
            Ok(_) => Notice::success("Task created"),
            Err(err) => {
                warn!(error = %err, "task creation failed");
                Notice::failure("Failed to add task", &err)
            }
        }
    }

    async fn try_submit(&self, request: CreateTaskRequest) -> TaskBoardResult<Task> {
        let _pending = self.begin(PendingMutation::Create)?;
        let task = self.client.create(request).await?;
        self.write().tasks.insert(0, task.clone());
        Ok(task)
    }

    /// Advances the cached task `id` one lifecycle step and stores the
    /// returned record in the cache.
    pub async fn advance(&self, id: TaskId) -> Notice {
        match self.try_advance(id).await {
            Ok(_) => Notice::success("Status updated"),
            Err(err) => {
                warn!(task_id = %id, error = %err, "task status update failed");
                Notice::failure("Update failed", &err)
            }
        }
    }

    async fn try_advance(&self, id: TaskId) -> TaskBoardResult<Task> {
        let current = self.task(id).ok_or(TaskBoardError::UnknownTask(id))?;
        let _pending = self.begin(PendingMutation::Update(id))?;
        let result = self.client.update_status(id, current.status()).await;
        let mut state = self.write();
        match result {
            Ok(updated) => {
                if let Some(slot) = state.tasks.iter_mut().find(|task| task.id() == id) {
                    slot.clone_from(&updated);
                }
                Ok(updated)
            }
            Err(err) => {
                if is_missing(&err) {
                    state.tasks.retain(|task| task.id() != id);
                }
                Err(err.into())
            }
        }
    }

    /// Deletes the task `id` and drops it from the cache.
    pub async fn remove(&self, id: TaskId) -> Notice {
        match self.try_remove(id).await {
            Ok(()) => Notice::info("Task deleted"),
            Err(err) => {
                warn!(task_id = %id, error = %err, "task deletion failed");
                Notice::failure("Delete failed", &err)
            }
        }
    }

    async fn try_remove(&self, id: TaskId) -> TaskBoardResult<()> {
        let _pending = self.begin(PendingMutation::Delete(id))?;
        self.client.delete(id).await?;
        self.write().tasks.retain(|task| task.id() != id);
        Ok(())
    }
}

fn is_missing(err: &TaskClientError) -> bool {
    matches!(err, TaskClientError::Store(store_err) if TaskStoreError::is_not_found(store_err))
}
