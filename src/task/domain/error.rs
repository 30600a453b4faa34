//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task identifier could not be parsed.
    #[error("invalid task id '{0}', expected a non-negative integer")]
    InvalidTaskId(String),
}

/// Error returned while parsing task statuses from wire or user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing a status lifecycle name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown status lifecycle '{0}', expected two_state or three_state")]
pub struct ParseLifecycleError(pub String);
