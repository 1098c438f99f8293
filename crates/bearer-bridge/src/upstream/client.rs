//! HTTP client for the upstream MCP endpoint.
//!
//! One POST per relayed message, with the bearer token attached to every
//! request. Responses are either a single JSON document or an SSE stream.

use bearer_bridge_core::BridgeConfig;
use bytes::Bytes;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use thiserror::Error;

/// `Accept` header sent with every request.
pub const ACCEPT_VALUE: &str = "application/json, text/event-stream";

/// Content-type marker selecting the SSE path.
pub const EVENT_STREAM: &str = "text/event-stream";

/// Upstream errors. Each one ends a relay operation with an error envelope
/// whose message is this error's display text.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Client for the configured endpoint.
#[derive(Debug)]
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoint: String,
}

impl UpstreamClient {
    pub fn new(config: &BridgeConfig) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        let mut token_val = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| UpstreamError::Config("Invalid token format".into()))?;
        token_val.set_sensitive(true);
        headers.insert(AUTHORIZATION, token_val);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));

        // reqwest is built with rustls-no-provider; `Err` means a provider is
        // already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one message. Non-2xx statuses are turned into
    /// [`UpstreamError::Status`] carrying the response body text.
    pub async fn post(&self, message: &Value) -> Result<UpstreamResponse, UpstreamError> {
        let body = serde_json::to_vec(message)?;
        let resp = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(UpstreamResponse { inner: resp })
    }
}

/// A successful upstream response.
#[derive(Debug)]
pub struct UpstreamResponse {
    inner: reqwest::Response,
}

impl UpstreamResponse {
    /// Whether the declared content type is an event stream.
    pub fn is_event_stream(&self) -> bool {
        self.inner
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().contains(EVENT_STREAM))
    }

    /// Read the whole body as one JSON document.
    pub async fn json(self) -> Result<Value, UpstreamError> {
        let body = self.inner.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Next body chunk, `None` once the stream is exhausted.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>, UpstreamError> {
        Ok(self.inner.chunk().await?)
    }
}
