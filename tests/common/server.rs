//! Mock vision provider server
//!
//! Speaks just enough of the Gemini and OpenAI chat completions APIs to drive
//! the real `reqwest` providers. Every call is recorded for inspection.

use super::constants::*;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// What the mock answers to generation calls.
#[derive(Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub delay: Duration,
}

impl Reply {
    /// A successful Gemini answer whose only text part is `text`.
    pub fn gemini_text(text: &str) -> Self {
        Self::ok(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 1200,
                "candidatesTokenCount": 180,
                "totalTokenCount": 1380
            }
        }))
    }

    /// A successful chat completion whose message content is `text`.
    pub fn openai_text(text: &str) -> Self {
        Self::ok(json!({
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 900, "completion_tokens": 150, "total_tokens": 1050}
        }))
    }

    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            delay: Duration::ZERO,
        }
    }

    /// An error in the `{"error": {"message"}}` envelope both APIs use.
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: json!({"error": {"code": status.as_u16(), "message": message}}),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request the mock received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub api_key: Option<String>,
    pub body: Value,
}

struct MockState {
    reply: Reply,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Mock provider bound to a random local port.
///
/// When dropped, the server shuts down.
pub struct MockProviderServer {
    /// Base URL to hand to the providers (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    state: Arc<MockState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl MockProviderServer {
    /// Spawns a mock answering every generation call with `reply`.
    ///
    /// # Panics
    ///
    /// Panics if the port cannot be bound or the server does not become ready.
    pub async fn spawn(reply: Reply) -> Self {
        let state = Arc::new(MockState {
            reply,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/health", get(|| async { "ok" }))
            .route("/models", get(openai_models))
            .route("/models/{model}", get(gemini_model).post(gemini_generate))
            .route("/chat/completions", post(openai_chat))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Mock server failed");
        });

        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        };
        server.wait_for_ready().await;
        server
    }

    /// All requests received so far, health checks included.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Number of generation calls received.
    pub fn generate_calls(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.path.ends_with(":generateContent") || r.path == "/chat/completions")
            .count()
    }

    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Mock server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/health", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
}

fn goog_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn record(state: &MockState, path: String, api_key: Option<String>, body: Value) {
    state.requests.lock().unwrap().push(RecordedRequest {
        path,
        api_key,
        body,
    });
}

async fn answer(state: &MockState, api_key: Option<&str>) -> (StatusCode, Json<Value>) {
    if api_key != Some(TEST_API_KEY) {
        let unauthorized = Reply::error(StatusCode::UNAUTHORIZED, "Invalid API key");
        return (unauthorized.status, Json(unauthorized.body));
    }
    let reply = state.reply.clone();
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    (reply.status, Json(reply.body))
}

async fn gemini_generate(
    State(state): State<Arc<MockState>>,
    Path(model): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let api_key = goog_key(&headers);
    record(&state, format!("/models/{}", model), api_key.clone(), body);
    answer(&state, api_key.as_deref()).await
}

async fn gemini_model(
    State(state): State<Arc<MockState>>,
    Path(model): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    let api_key = goog_key(&headers);
    record(&state, format!("/models/{}", model), api_key.clone(), Value::Null);
    if api_key.as_deref() == Some(TEST_API_KEY) {
        StatusCode::OK
    } else {
        StatusCode::FORBIDDEN
    }
}

async fn openai_chat(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let api_key = bearer(&headers);
    record(&state, "/chat/completions".to_string(), api_key.clone(), body);
    answer(&state, api_key.as_deref()).await
}

async fn openai_models(State(state): State<Arc<MockState>>, headers: HeaderMap) -> StatusCode {
    let api_key = bearer(&headers);
    record(&state, "/models".to_string(), api_key.clone(), Value::Null);
    if api_key.as_deref() == Some(TEST_API_KEY) {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}
