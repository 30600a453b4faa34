//! Transport port for the task API and its `reqwest` implementation.

use crate::task::ports::{TaskStoreError, TaskStoreResult};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use std::time::Duration;
use tracing::debug;

/// Request methods used by the task API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A request relative to the configured API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method.
    pub method: HttpMethod,
    /// Path appended to the base URL, starting with `/`.
    pub path: String,
    /// JSON body, if any.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Creates a request without a body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A fully read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code.
    pub status: u16,
    /// Status text, e.g. `Not Found`.
    pub status_text: Option<String>,
    /// Response body as text; empty when there is none.
    pub body: String,
}

impl HttpResponse {
    /// Returns `true` for 2xx status codes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Text-based request/response exchange with the task API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and reads the whole response.
    ///
    /// Non-success statuses are returned as responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transport`] when no response is received.
    async fn send(&self, request: HttpRequest) -> TaskStoreResult<HttpResponse>;
}

/// [`HttpTransport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Creates a transport for `base_url` with an optional request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transport`] when the client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> TaskStoreResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }
        let client = builder
            .build()
            .map_err(|err| TaskStoreError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

const fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> TaskStoreResult<HttpResponse> {
        let url = self.url_for(&request.path);
        debug!(method = request.method.as_str(), %url, "sending task API request");

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| TaskStoreError::Transport(err.to_string()))?;
        let status = response.status();
        let body = match response.text().await {
            Ok(text) => text,
            // An unreadable error body falls back to the status text.
            Err(err) if !status.is_success() => {
                debug!(status = status.as_u16(), %url, error = %err, "failed to read error body");
                String::new()
            }
            Err(err) => return Err(TaskStoreError::Transport(err.to_string())),
        };

        debug!(status = status.as_u16(), %url, "received task API response");
        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().map(str::to_owned),
            body,
        })
    }
}
