//! Local task store adapter.
//!
//! Stands in for the remote task API by persisting the task collection and
//! an identifier counter under two storage keys.

mod storage;
mod store;

pub use storage::{DirStorage, InMemoryStorage, KeyValueStorage};
pub use store::{LocalStoreConfig, LocalTaskStore};
