//! Task client: validated task operations over any task store.

use crate::task::{
    domain::{NewTask, StatusLifecycle, Task, TaskDomainError, TaskId, TaskStatus},
    ports::{TaskStore, TaskStoreError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Request payload for creating a task from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the raw title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Sets the raw description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn into_new_task(self) -> Result<NewTask, TaskDomainError> {
        let new_task = NewTask::new(self.title)?;
        Ok(match self.description {
            Some(description) => new_task.with_description(description),
            None => new_task,
        })
    }
}

/// Service-level errors for task client operations.
#[derive(Debug, Error)]
pub enum TaskClientError {
    /// Input validation failed before any store call.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for task client operations.
pub type TaskClientResult<T> = Result<T, TaskClientError>;

/// Client translating task operations into store calls.
///
/// The client owns the status lifecycle: callers pass a task's current status
/// and the client submits the next one.
#[derive(Debug)]
pub struct TaskClient<S>
where
    S: TaskStore,
{
    store: Arc<S>,
    lifecycle: StatusLifecycle,
}

impl<S> Clone for TaskClient<S>
where
    S: TaskStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            lifecycle: self.lifecycle,
        }
    }
}

impl<S> TaskClient<S>
where
    S: TaskStore,
{
    /// Creates a client over `store` using `lifecycle` for status updates.
    #[must_use]
    pub const fn new(store: Arc<S>, lifecycle: StatusLifecycle) -> Self {
        Self { store, lifecycle }
    }

    /// Returns the configured lifecycle.
    #[must_use]
    pub const fn lifecycle(&self) -> StatusLifecycle {
        self.lifecycle
    }

    /// Returns the status an update from `current` would submit.
    #[must_use]
    pub const fn next_status(&self, current: TaskStatus) -> TaskStatus {
        self.lifecycle.next(current)
    }

    /// Lists all tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskClientError::Store`] when the store fails.
    pub async fn list(&self) -> TaskClientResult<Vec<Task>> {
        Ok(self.store.list().await?)
    }

    /// Validates the request and creates a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskClientError::Domain`] for an empty title, without
    /// contacting the store, or [`TaskClientError::Store`] when the store
    /// fails.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskClientResult<Task> {
        let new_task = request.into_new_task()?;
        let task = self.store.create(&new_task).await?;
        debug!(task_id = %task.id(), "created task");
        Ok(task)
    }

    /// Advances a task one lifecycle step from its `current` status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskClientError::Store`] when the task does not exist or the
    /// store fails.
    pub async fn update_status(&self, id: TaskId, current: TaskStatus) -> TaskClientResult<Task> {
        let next = self.next_status(current);
        debug!(task_id = %id, from = current.as_str(), to = next.as_str(), "advancing task");
        Ok(self.store.set_status(id, next).await?)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskClientError::Store`] when the store fails.
    pub async fn delete(&self, id: TaskId) -> TaskClientResult<()> {
        self.store.delete(id).await?;
        debug!(task_id = %id, "deleted task");
        Ok(())
    }
}
