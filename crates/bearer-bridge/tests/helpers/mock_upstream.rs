//! Mock MCP upstream for integration testing.
//!
//! Dispatches on the JSON-RPC `method` of each POST:
//! - `echo`: JSON result echoing the params and the auth-related headers
//! - `sse`: event-stream with two events, a comment and `[DONE]`
//! - `sse_chunked`: event-stream whose lines are split across chunks
//! - `sse_abort`: event-stream that sends two events and then breaks off
//! - `ordered`: JSON result with deliberately unsorted keys
//! - `fail`: HTTP 500 with body `boom`
//! - `bad_json`: 200 `application/json` with an unparseable body
//! - `slow`: JSON result after a short delay
//! - `hang`: never answers within a test's lifetime

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;

/// Delay used by the `slow` method.
pub const SLOW_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Default)]
struct MockState {
    requests: AtomicUsize,
}

/// Running mock server.
pub struct MockUpstream {
    pub addr: SocketAddr,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/mcp", post(handle))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/mcp", self.addr)
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match method.as_str() {
        "echo" => {
            let get = |name: header::HeaderName| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            json_response(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "params": request.get("params").cloned().unwrap_or(Value::Null),
                    "authorization": get(header::AUTHORIZATION),
                    "accept": get(header::ACCEPT),
                    "content_type": get(header::CONTENT_TYPE),
                }
            }))
        }
        "sse" => {
            let body = format!(
                ": connected\n\nevent: message\ndata: {}\n\ndata: {}\n\ndata: [DONE]\n\n",
                json!({"jsonrpc": "2.0", "method": "notifications/progress", "params": {"progress": 1}}),
                json!({"jsonrpc": "2.0", "id": id, "result": {"done": true}}),
            );
            sse_response(Body::from(body))
        }
        "sse_chunked" => {
            let full = format!(
                "data: {}\n\ndata: {}\n\ndata: not-json\n\ndata: [DONE]\n\ndata: {{\"tail\":",
                json!({"seq": 1, "text": "caf\u{e9}"}),
                json!({"jsonrpc": "2.0", "id": id, "result": {"seq": 2}}),
            );
            let (tx, rx) = mpsc::channel::<Result<Vec<u8>, Infallible>>(64);
            tokio::spawn(async move {
                for piece in full.as_bytes().chunks(5) {
                    if tx.send(Ok(piece.to_vec())).await.is_err() {
                        return;
                    }
                    tokio::time::sleep(Duration::from_millis(2)).await;
                }
            });
            sse_response(Body::from_stream(ReceiverStream::new(rx)))
        }
        "sse_abort" => {
            let events = format!(
                "data: {}\n\ndata: {}\n\n",
                json!({"seq": 1}),
                json!({"seq": 2}),
            );
            let (tx, rx) = mpsc::channel::<Result<Vec<u8>, std::io::Error>>(4);
            tokio::spawn(async move {
                if tx.send(Ok(events.into_bytes())).await.is_err() {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
                let _ = tx
                    .send(Err(std::io::Error::other("upstream went away")))
                    .await;
            });
            sse_response(Body::from_stream(ReceiverStream::new(rx)))
        }
        "ordered" => (
            [(header::CONTENT_TYPE, "application/json")],
            format!(r#"{{"jsonrpc":"2.0","id":{id},"result":{{"zeta":1,"alpha":2,"mid":3}}}}"#),
        )
            .into_response(),
        "fail" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "bad_json" => (
            [(header::CONTENT_TYPE, "application/json")],
            "this is not json",
        )
            .into_response(),
        "slow" => {
            tokio::time::sleep(SLOW_DELAY).await;
            json_response(json!({"jsonrpc": "2.0", "id": id, "result": "slow"}))
        }
        "hang" => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            json_response(json!({"jsonrpc": "2.0", "id": id, "result": "late"}))
        }
        _ => json_response(json!({"jsonrpc": "2.0", "id": id, "result": {}})),
    }
}

fn json_response(value: Value) -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        value.to_string(),
    )
        .into_response()
}

fn sse_response(body: Body) -> Response {
    (
        [(header::CONTENT_TYPE, "text/event-stream; charset=utf-8")],
        body,
    )
        .into_response()
}
