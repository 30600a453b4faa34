//! Store port for listing, creating, updating, and deleting tasks.

use crate::task::domain::{NewTask, Task, TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task collection contract shared by the remote API and the local store.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns every stored task in store order.
    async fn list(&self) -> TaskStoreResult<Vec<Task>>;

    /// Creates a task and returns it with its assigned identity.
    ///
    /// The returned task is `pending` with no completion timestamp.
    async fn create(&self, new_task: &NewTask) -> TaskStoreResult<Task>;

    /// Sets the status of an existing task and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn set_status(&self, id: TaskId, status: TaskStatus) -> TaskStoreResult<Task>;

    /// Removes a task.
    ///
    /// Deleting an identifier that is not stored leaves the remaining
    /// collection untouched.
    async fn delete(&self, id: TaskId) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    ///
    /// `message` is the response body, or the status text when the body is
    /// empty.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Body text or status text.
        message: String,
    },

    /// A response that must carry a task carried no usable body.
    #[error("empty response from {0}")]
    EmptyResponse(String),

    /// A payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Returns `true` when the error reports a missing task, either from the
    /// store itself or as an HTTP 404 from the remote API.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Status { status: 404, .. })
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
