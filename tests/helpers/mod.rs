//! Test Helper Utilities
//!
//! In-process mock of the annotation platform API. Runs a real axum server
//! on an ephemeral port so client tests exercise genuine HTTP round trips,
//! headers and body streaming included.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// API key the mock platform accepts; anything else gets 401
pub const TEST_API_KEY: &str = "test-key";

/// Scriptable state shared with the handlers
#[derive(Default)]
pub struct MockState {
    /// Tasks handed out in order by POST /api/tasks/request
    tasks: Mutex<Vec<Value>>,
    /// When set, submit responds with this status and body instead
    submit_failure: Mutex<Option<(u16, String)>>,
    /// When true, the available-count endpoint responds 500
    count_failure: AtomicBool,
    /// Bytes served by GET /audio/{name}
    audio_body: Mutex<Vec<u8>>,
    /// Per-endpoint hit counters
    pub request_hits: AtomicUsize,
    pub submit_hits: AtomicUsize,
    pub skip_hits: AtomicUsize,
    pub download_hits: AtomicUsize,
    pub stats_hits: AtomicUsize,
}

/// Handle to a running mock platform
pub struct MockPlatform {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockPlatform {
    /// Start a mock platform on an ephemeral local port
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());

        let router = Router::new()
            .route("/api/health", get(health))
            .route("/api/tasks/request", post(request_task))
            .route("/api/tasks/available/count", get(available_count))
            .route("/api/tasks/:task_id/submit", post(submit))
            .route("/api/tasks/:task_id/skip", post(skip))
            .route("/api/agents/:agent_id/stats", get(stats))
            .route("/audio/:name", get(audio))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        MockPlatform { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL of the mock audio route for `name`
    pub fn audio_url(&self, name: &str) -> String {
        format!("http://{}/audio/{}", self.addr, name)
    }

    /// Queue a task for the next request; the pool reports "no task" once
    /// the queue is drained
    pub fn push_task(&self, task: Value) {
        self.state.tasks.lock().unwrap().push(task);
    }

    /// Set the bytes served by the audio route
    pub fn set_audio_body(&self, bytes: Vec<u8>) {
        *self.state.audio_body.lock().unwrap() = bytes;
    }

    /// Make the submit endpoint fail with `status` and `body`
    pub fn fail_submit(&self, status: u16, body: &str) {
        *self.state.submit_failure.lock().unwrap() = Some((status, body.to_string()));
    }

    /// Make the available-count endpoint respond 500
    pub fn fail_count(&self) {
        self.state.count_failure.store(true, Ordering::SeqCst);
    }

    pub fn request_hits(&self) -> usize {
        self.state.request_hits.load(Ordering::SeqCst)
    }

    pub fn submit_hits(&self) -> usize {
        self.state.submit_hits.load(Ordering::SeqCst)
    }

    pub fn skip_hits(&self) -> usize {
        self.state.skip_hits.load(Ordering::SeqCst)
    }

    pub fn download_hits(&self) -> usize {
        self.state.download_hits.load(Ordering::SeqCst)
    }

    pub fn stats_hits(&self) -> usize {
        self.state.stats_hits.load(Ordering::SeqCst)
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("x-api-key").and_then(|v| v.to_str().ok()) == Some(TEST_API_KEY)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Invalid API key"})),
    )
        .into_response()
}

async fn health(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({"status": "healthy"}))).into_response()
}

async fn request_task(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.request_hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    if body.get("agent_id").and_then(Value::as_i64).is_none() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "agent_id required"})),
        )
            .into_response();
    }

    let mut tasks = state.tasks.lock().unwrap();
    let response = if tasks.is_empty() {
        json!({"task_id": null})
    } else {
        tasks.remove(0)
    };
    (StatusCode::OK, Json(response)).into_response()
}

async fn available_count(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if state.count_failure.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "count unavailable"})),
        )
            .into_response();
    }
    (
        StatusCode::OK,
        Json(json!({"available": 5, "total_unlabeled": 12, "total_locked": 3})),
    )
        .into_response()
}

async fn submit(
    State(state): State<Arc<MockState>>,
    Path(task_id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.submit_hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }

    if let Some((status, message)) = state.submit_failure.lock().unwrap().clone() {
        return (
            StatusCode::from_u16(status).unwrap(),
            Json(json!({"detail": message})),
        )
            .into_response();
    }

    let transcription = body.get("transcription").and_then(Value::as_str);
    if transcription.is_none() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "transcription required"})),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        Json(json!({"status": "ok", "annotation_id": 7, "task_id": task_id})),
    )
        .into_response()
}

async fn skip(
    State(state): State<Arc<MockState>>,
    Path(task_id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.skip_hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }

    let reason = body
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or("unspecified");
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "message": format!("Task {} skipped: {}", task_id, reason),
        })),
    )
        .into_response()
}

async fn stats(
    State(state): State<Arc<MockState>>,
    Path(agent_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    state.stats_hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    let _ = agent_id;
    (
        StatusCode::OK,
        Json(json!({
            "total_tasks_completed": 10,
            "total_tasks_skipped": 2,
            "total_duration_seconds": 345.6,
            "total_earnings": 12.5,
        })),
    )
        .into_response()
}

async fn audio(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.download_hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    let body = state.audio_body.lock().unwrap().clone();
    (StatusCode::OK, body).into_response()
}
