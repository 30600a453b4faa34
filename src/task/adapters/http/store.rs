//! Task store backed by the remote task API.

use super::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::task::{
    domain::{NewTask, Task, TaskId, TaskStatus},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

const COLLECTION_PATH: &str = "/tasx";

fn update_path(id: TaskId) -> String {
    format!("{COLLECTION_PATH}/update/{id}")
}

fn delete_path(id: TaskId) -> String {
    format!("{COLLECTION_PATH}/delete/{id}")
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: TaskStatus,
}

/// [`TaskStore`] that talks to the task API over an [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTaskStore<T>
where
    T: HttpTransport,
{
    transport: Arc<T>,
}

impl<T> HttpTaskStore<T>
where
    T: HttpTransport,
{
    /// Creates a store over the given transport.
    #[must_use]
    pub const fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    async fn exchange<R>(&self, request: HttpRequest) -> TaskStoreResult<Option<R>>
    where
        R: DeserializeOwned,
    {
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        let Some(text) = read_body(response)? else {
            return Ok(None);
        };
        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) => {
                warn!(%path, error = %err, "task API returned a body that is not valid JSON");
                return Ok(None);
            }
        };
        serde_json::from_value(value).map(Some).map_err(|err| {
            TaskStoreError::Serialization(format!("unexpected response shape from {path}: {err}"))
        })
    }

    async fn exchange_task(&self, request: HttpRequest) -> TaskStoreResult<Task> {
        let path = request.path.clone();
        self.exchange(request)
            .await?
            .ok_or(TaskStoreError::EmptyResponse(path))
    }
}

/// Converts a response into its body text.
///
/// Non-success statuses become [`TaskStoreError::Status`] carrying the body,
/// falling back to the status text and then the numeric code. No-content
/// statuses and empty bodies yield `None`.
fn read_body(response: HttpResponse) -> TaskStoreResult<Option<String>> {
    if !response.is_success() {
        let message = if response.body.is_empty() {
            response
                .status_text
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| response.status.to_string())
        } else {
            response.body
        };
        return Err(TaskStoreError::Status {
            status: response.status,
            message,
        });
    }
    if matches!(response.status, 204 | 205) || response.body.is_empty() {
        return Ok(None);
    }
    Ok(Some(response.body))
}

fn to_json(value: &impl Serialize) -> TaskStoreResult<String> {
    serde_json::to_string(value).map_err(|err| TaskStoreError::Serialization(err.to_string()))
}

#[async_trait]
impl<T> TaskStore for HttpTaskStore<T>
where
    T: HttpTransport,
{
    async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        let tasks = self
            .exchange(HttpRequest::new(HttpMethod::Get, COLLECTION_PATH))
            .await?;
        Ok(tasks.unwrap_or_default())
    }

    async fn create(&self, new_task: &NewTask) -> TaskStoreResult<Task> {
        let request =
            HttpRequest::new(HttpMethod::Post, COLLECTION_PATH).with_body(to_json(new_task)?);
        self.exchange_task(request).await
    }

    async fn set_status(&self, id: TaskId, status: TaskStatus) -> TaskStoreResult<Task> {
        let request = HttpRequest::new(HttpMethod::Patch, update_path(id))
            .with_body(to_json(&StatusBody { status })?);
        self.exchange_task(request).await
    }

    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        let response = self
            .transport
            .send(HttpRequest::new(HttpMethod::Delete, delete_path(id)))
            .await?;
        read_body(response)?;
        Ok(())
    }
}
