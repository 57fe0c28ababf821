//! Test utilities for blueprint-core
//!
//! A mock Gemini server speaking just enough of the REST API for the
//! backend and CLI tests: `POST /v1beta/models/{model}:generateContent`
//! and `GET /v1beta/models/{model}`.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// What the mock server answers with
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 200 with a single candidate whose text is this string
    Text(String),
    /// Error status with this body
    Status(u16, String),
}

#[derive(Clone)]
struct ServerState {
    reply: MockReply,
    last_api_key: Arc<Mutex<Option<String>>>,
    last_mime_type: Arc<Mutex<Option<String>>>,
}

/// Mock Gemini server for testing
pub struct MockGeminiServer {
    addr: SocketAddr,
    last_api_key: Arc<Mutex<Option<String>>>,
    last_mime_type: Arc<Mutex<Option<String>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGeminiServer {
    /// Start the mock server on an available port
    pub async fn start(reply: MockReply) -> Self {
        let last_api_key = Arc::new(Mutex::new(None));
        let last_mime_type = Arc::new(Mutex::new(None));
        let state = ServerState {
            reply,
            last_api_key: last_api_key.clone(),
            last_mime_type: last_mime_type.clone(),
        };

        let app = Router::new()
            .route(
                "/v1beta/models/:model",
                get(handle_model_info).post(handle_generate),
            )
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            last_api_key,
            last_mime_type,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// API key header seen on the most recent request
    pub fn last_api_key(&self) -> Option<String> {
        self.last_api_key.lock().unwrap().clone()
    }

    /// Inline image mime type of the most recent generate request
    pub fn last_mime_type(&self) -> Option<String> {
        self.last_mime_type.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn record_key(state: &ServerState, headers: &HeaderMap) {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_api_key.lock().unwrap() = key;
}

fn error_response(status: u16, body: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, body.to_string()).into_response()
}

/// Model metadata endpoint (health check)
async fn handle_model_info(
    State(state): State<ServerState>,
    Path(model): Path<String>,
    headers: HeaderMap,
) -> Response {
    record_key(&state, &headers);
    match &state.reply {
        MockReply::Status(status, body) => error_response(*status, body),
        MockReply::Text(_) => Json(json!({
            "name": format!("models/{}", model),
            "supportedGenerationMethods": ["generateContent"],
        }))
        .into_response(),
    }
}

/// `{model}:generateContent` endpoint
async fn handle_generate(
    State(state): State<ServerState>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    record_key(&state, &headers);
    if !model_action.ends_with(":generateContent") {
        return error_response(404, "unknown method");
    }
    if request["contents"][0]["parts"].as_array().map(Vec::len) != Some(3) {
        return error_response(400, "expected prompt, instruction and image parts");
    }
    *state.last_mime_type.lock().unwrap() = request["contents"][0]["parts"][2]["inlineData"]
        ["mimeType"]
        .as_str()
        .map(str::to_string);

    match &state.reply {
        MockReply::Status(status, body) => error_response(*status, body),
        MockReply::Text(text) => Json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        }))
        .into_response(),
    }
}
