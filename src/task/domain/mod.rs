//! Domain model for task tracking.
//!
//! The task domain models the task record, its creation payload, and the
//! forward-only status lifecycle while keeping transport and storage
//! concerns outside of the domain boundary.

mod error;
mod ids;
mod status;
mod task;

pub use error::{ParseLifecycleError, ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use status::{StatusAction, StatusLifecycle, TaskStatus};
pub use task::{NewTask, PersistedTaskData, Task};
