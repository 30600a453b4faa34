//! Startup configuration and backend selection.
//!
//! Configuration is read once from the environment. When `TASX_API_URL` is
//! set the remote task API is used; otherwise tasks live in a local store
//! directory.

use crate::task::{
    adapters::{
        http::{HttpTaskStore, ReqwestTransport},
        local::{DirStorage, LocalStoreConfig, LocalTaskStore},
    },
    domain::{NewTask, StatusLifecycle, Task, TaskId, TaskStatus},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use mockable::DefaultClock;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the task API base URL.
pub const API_URL_ENV: &str = "TASX_API_URL";
/// Environment variable selecting the status lifecycle.
pub const LIFECYCLE_ENV: &str = "TASX_LIFECYCLE";
/// Environment variable holding the request timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "TASX_TIMEOUT_MS";
/// Environment variable holding the local store directory.
pub const STORE_DIR_ENV: &str = "TASX_STORE_DIR";
/// Environment variable holding the local store latency in milliseconds.
pub const LATENCY_ENV: &str = "TASX_LATENCY_MS";

const DEFAULT_STORE_DIR: &str = ".tasx";
const DEFAULT_LATENCY_MS: u64 = 300;

/// Errors raised while loading configuration or building a backend.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Parse failure description.
        reason: String,
    },
    /// The configured backend could not be opened.
    #[error("failed to open task backend: {0}")]
    Backend(#[from] TaskStoreError),
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TasxConfig {
    /// Task API base URL; `None` selects the local store.
    pub api_url: Option<String>,
    /// Status lifecycle used for updates.
    pub lifecycle: StatusLifecycle,
    /// Request timeout for the task API.
    pub request_timeout_ms: Option<u64>,
    /// Directory holding the local store.
    pub store_dir: Utf8PathBuf,
    /// Artificial delay applied by the local store.
    pub latency_ms: u64,
}

impl Default for TasxConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            lifecycle: StatusLifecycle::default(),
            request_timeout_ms: None,
            store_dir: Utf8PathBuf::from(DEFAULT_STORE_DIR),
            latency_ms: DEFAULT_LATENCY_MS,
        }
    }
}

fn parse_millis(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|err| ConfigError::InvalidValue {
            name,
            value: raw.to_owned(),
            reason: err.to_string(),
        })
}

impl TasxConfig {
    /// Loads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which maps variable names to
    /// values. Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = read(API_URL_ENV) {
            config.api_url = Some(url.trim().to_owned());
        }
        if let Some(raw) = read(LIFECYCLE_ENV) {
            config.lifecycle = StatusLifecycle::try_from(raw.as_str()).map_err(|err| {
                ConfigError::InvalidValue {
                    name: LIFECYCLE_ENV,
                    value: raw.clone(),
                    reason: err.to_string(),
                }
            })?;
        }
        if let Some(raw) = read(TIMEOUT_ENV) {
            config.request_timeout_ms = Some(parse_millis(TIMEOUT_ENV, &raw)?);
        }
        if let Some(raw) = read(STORE_DIR_ENV) {
            config.store_dir = Utf8PathBuf::from(raw.trim());
        }
        if let Some(raw) = read(LATENCY_ENV) {
            config.latency_ms = parse_millis(LATENCY_ENV, &raw)?;
        }
        Ok(config)
    }

    /// Returns the request timeout, if configured.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Returns the local store settings derived from this configuration.
    #[must_use]
    pub fn local_store_config(&self) -> LocalStoreConfig {
        LocalStoreConfig::default().with_latency(Duration::from_millis(self.latency_ms))
    }

    /// Opens the backend selected by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Backend`] when the HTTP client cannot be built
    /// or the local store cannot be opened.
    pub fn open_backend(&self) -> Result<TaskBackend, ConfigError> {
        if let Some(url) = &self.api_url {
            let transport = ReqwestTransport::new(url, self.request_timeout())?;
            return Ok(TaskBackend::Remote(HttpTaskStore::new(Arc::new(transport))));
        }
        let storage = DirStorage::open(&self.store_dir)?;
        let store = LocalTaskStore::open(
            Arc::new(storage),
            Arc::new(DefaultClock),
            self.local_store_config(),
        )?;
        Ok(TaskBackend::Local(store))
    }
}

/// Task store chosen at startup.
pub enum TaskBackend {
    /// The remote task API.
    Remote(HttpTaskStore<ReqwestTransport>),
    /// The directory-backed local store.
    Local(LocalTaskStore<DirStorage, DefaultClock>),
}

impl TaskBackend {
    /// Returns a short description of the backend.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Remote(_) => "remote",
            Self::Local(_) => "local",
        }
    }
}

#[async_trait]
impl TaskStore for TaskBackend {
    async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        match self {
            Self::Remote(store) => store.list().await,
            Self::Local(store) => store.list().await,
        }
    }

    async fn create(&self, new_task: &NewTask) -> TaskStoreResult<Task> {
        match self {
            Self::Remote(store) => store.create(new_task).await,
            Self::Local(store) => store.create(new_task).await,
        }
    }

    async fn set_status(&self, id: TaskId, status: TaskStatus) -> TaskStoreResult<Task> {
        match self {
            Self::Remote(store) => store.set_status(id, status).await,
            Self::Local(store) => store.set_status(id, status).await,
        }
    }

    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        match self {
            Self::Remote(store) => store.delete(id).await,
            Self::Local(store) => store.delete(id).await,
        }
    }
}
