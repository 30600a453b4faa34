//! Key-value storage used by the local task store.

use crate::task::ports::{TaskStoreError, TaskStoreResult};
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::collections::HashMap;
use std::io;
use std::sync::RwLock;

/// String-keyed blob storage.
pub trait KeyValueStorage: Send + Sync {
    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the backend fails.
    fn get(&self, key: &str) -> TaskStoreResult<Option<String>>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the backend fails.
    fn set(&self, key: &str, value: &str) -> TaskStoreResult<()>;
}

/// Process-local storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TaskStoreError {
    TaskStoreError::persistence(io::Error::other(err.to_string()))
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> TaskStoreResult<Option<String>> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> TaskStoreResult<()> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Storage keeping one file per key inside a directory.
#[derive(Debug)]
pub struct DirStorage {
    dir: Dir,
}

impl DirStorage {
    /// Opens `path`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &Utf8Path) -> TaskStoreResult<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(TaskStoreError::persistence)?;
        let dir =
            Dir::open_ambient_dir(path, ambient_authority()).map_err(TaskStoreError::persistence)?;
        Ok(Self { dir })
    }
}

impl KeyValueStorage for DirStorage {
    fn get(&self, key: &str) -> TaskStoreResult<Option<String>> {
        match self.dir.read_to_string(key) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(TaskStoreError::persistence(err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> TaskStoreResult<()> {
        self.dir
            .write(key, value)
            .map_err(TaskStoreError::persistence)
    }
}
