//! HTTP client integration tests against a loopback task API.
//!
//! The fake API is an axum router serving the four task endpoints under
//! `/api/v1`. A few extra routes answer with failures to exercise error
//! reporting: `/failing` (503, no body), `/teapot` (418 with a body), and
//! `/truncated` (500 whose body is cut off mid-stream).

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch},
};
use futures::{StreamExt, stream};
use serde_json::{Value, json};
use tasx::task::{
    adapters::http::{HttpTaskStore, ReqwestTransport},
    domain::{StatusLifecycle, TaskId, TaskStatus},
    ports::TaskStoreError,
    services::{CreateTaskRequest, TaskClient, TaskClientError},
};
use tokio::net::TcpListener;

#[derive(Default)]
struct FakeApi {
    tasks: Mutex<Vec<Value>>,
    next_id: AtomicU64,
}

type SharedApi = Arc<FakeApi>;

impl FakeApi {
    fn tasks(&self) -> std::sync::MutexGuard<'_, Vec<Value>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn list_tasks(State(api): State<SharedApi>) -> Json<Value> {
    Json(Value::Array(api.tasks().clone()))
}

async fn create_task(
    State(api): State<SharedApi>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let id = api.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let mut task = json!({
        "id": id,
        "title": payload.get("title").cloned().unwrap_or(Value::Null),
        "status": "pending",
        "created_at": chrono::Utc::now().to_rfc3339(),
        "completed_at": null
    });
    if let Some(description) = payload.get("description") {
        task["description"] = description.clone();
    }
    api.tasks().push(task.clone());
    (StatusCode::CREATED, Json(task))
}

async fn update_task(
    State(api): State<SharedApi>,
    Path(id): Path<u64>,
    Json(payload): Json<Value>,
) -> Response {
    let status = payload.get("status").cloned().unwrap_or(Value::Null);
    let mut tasks = api.tasks();
    let Some(task) = tasks.iter_mut().find(|task| task["id"] == json!(id)) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };
    task["completed_at"] = if status == json!("done") {
        json!(chrono::Utc::now().to_rfc3339())
    } else {
        Value::Null
    };
    task["status"] = status;
    Json(task.clone()).into_response()
}

async fn delete_task(State(api): State<SharedApi>, Path(id): Path<u64>) -> StatusCode {
    api.tasks().retain(|task| task["id"] != json!(id));
    StatusCode::NO_CONTENT
}

async fn truncated_failure() -> Response {
    let chunks = stream::iter([Ok::<_, io::Error>("abc")]).chain(stream::once(async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Err::<&'static str, _>(io::Error::other("connection dropped mid-body"))
    }));
    (StatusCode::INTERNAL_SERVER_ERROR, Body::from_stream(chunks)).into_response()
}

fn router() -> Router {
    let api = Router::new()
        .route("/tasx", get(list_tasks).post(create_task))
        .route("/tasx/update/{id}", patch(update_task))
        .route("/tasx/delete/{id}", delete(delete_task))
        .with_state(SharedApi::default());

    Router::new()
        .nest("/api/v1", api)
        .route("/failing/tasx", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route(
            "/teapot/tasx/delete/{id}",
            delete(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }),
        )
        .route("/truncated/tasx", get(truncated_failure))
}

async fn spawn_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback listener");
    let address = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router()).await.ok();
    });
    format!("http://{address}")
}

fn client_for(base_url: &str) -> TaskClient<HttpTaskStore<ReqwestTransport>> {
    let transport = ReqwestTransport::new(base_url, None).expect("transport builds");
    TaskClient::new(
        Arc::new(HttpTaskStore::new(Arc::new(transport))),
        StatusLifecycle::ThreeState,
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn create_advance_and_delete_round_trip() {
    let server = spawn_api().await;
    let client = client_for(&format!("{server}/api/v1/"));

    let created = client
        .create(CreateTaskRequest::new("Buy milk"))
        .await
        .expect("create should succeed");
    assert_eq!(created.status(), TaskStatus::Pending);
    assert!(created.completed_at().is_none());
    assert_eq!(created.description(), None);

    let started = client
        .update_status(created.id(), created.status())
        .await
        .expect("update should succeed");
    assert_eq!(started.status(), TaskStatus::InProgress);
    assert!(started.completed_at().is_none());

    let finished = client
        .update_status(started.id(), started.status())
        .await
        .expect("update should succeed");
    assert_eq!(finished.status(), TaskStatus::Done);
    assert!(finished.completed_at().is_some());

    let listed = client.list().await.expect("list should succeed");
    assert_eq!(listed.len(), 1);

    client
        .delete(created.id())
        .await
        .expect("delete should succeed");
    let remaining = client.list().await.expect("list should succeed");
    assert!(remaining.iter().all(|task| task.id() != created.id()));
}

#[tokio::test(flavor = "multi_thread")]
async fn description_is_sent_when_present() {
    let server = spawn_api().await;
    let client = client_for(&format!("{server}/api/v1"));

    let created = client
        .create(CreateTaskRequest::new(" Wireframe ").with_description(" Figma draft "))
        .await
        .expect("create should succeed");

    assert_eq!(created.title(), "Wireframe");
    assert_eq!(created.description(), Some("Figma draft"));
}

#[tokio::test(flavor = "multi_thread")]
async fn update_of_missing_task_surfaces_not_found_body() {
    let server = spawn_api().await;
    let client = client_for(&format!("{server}/api/v1"));

    let result = client
        .update_status(TaskId::new(41), TaskStatus::Pending)
        .await;

    let Err(TaskClientError::Store(err)) = result else {
        panic!("expected store error");
    };
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Not found");
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_error_body_falls_back_to_status_text() {
    let server = spawn_api().await;
    let client = client_for(&format!("{server}/failing"));

    let result = client.list().await;

    let Err(TaskClientError::Store(err)) = result else {
        panic!("expected store error");
    };
    assert!(matches!(err, TaskStoreError::Status { status: 503, .. }));
    assert_eq!(err.to_string(), "Service Unavailable");
}

#[tokio::test(flavor = "multi_thread")]
async fn error_body_becomes_the_message() {
    let server = spawn_api().await;
    let client = client_for(&format!("{server}/teapot"));

    let result = client.delete(TaskId::new(1)).await;

    let Err(err) = result else {
        panic!("expected failure");
    };
    assert_eq!(err.to_string(), "short and stout");
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_api_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback listener");
    let address = listener.local_addr().expect("listener address");
    drop(listener);
    let client = client_for(&format!("http://{address}"));

    let result = client.list().await;

    assert!(matches!(
        result,
        Err(TaskClientError::Store(TaskStoreError::Transport(_)))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn unreadable_error_body_falls_back_to_status_text() {
    let server = spawn_api().await;
    let client = client_for(&format!("{server}/truncated"));

    let result = client.list().await;

    let Err(TaskClientError::Store(err)) = result else {
        panic!("expected store error");
    };
    assert!(matches!(err, TaskStoreError::Status { status: 500, .. }));
    assert_eq!(err.to_string(), "Internal Server Error");
}
