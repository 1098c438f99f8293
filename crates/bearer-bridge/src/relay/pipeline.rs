//! The relay loop.
//!
//! Input lines are read sequentially; every decoded message is relayed on its
//! own task so a slow or streaming response never holds up the next line.

use std::sync::Arc;

use bearer_bridge_core::BridgeConfig;
use bearer_bridge_core::framing::{LineCodec, SseDecoder};
use bearer_bridge_core::jsonrpc::{self, INTERNAL_ERROR};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Semaphore;
use tokio_stream::StreamExt;
use tokio_util::codec::FramedRead;
use tracing::{debug, info, warn};

use super::emitter::Emitter;
use super::lifecycle::Lifecycle;
use crate::upstream::{UpstreamClient, UpstreamError};

/// Stdio-to-HTTP bridge.
#[derive(Debug)]
pub struct Bridge {
    client: Arc<UpstreamClient>,
    limiter: Option<Arc<Semaphore>>,
    lifecycle: Arc<Lifecycle>,
}

impl Bridge {
    pub fn new(config: &BridgeConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: Arc::new(UpstreamClient::new(config)?),
            limiter: config.max_in_flight.map(|n| Arc::new(Semaphore::new(n))),
            lifecycle: Lifecycle::new(),
        })
    }

    pub const fn lifecycle(&self) -> &Arc<Lifecycle> {
        &self.lifecycle
    }

    /// Relay every message read from `input`, writing results to `output`.
    ///
    /// Returns once `input` has ended and every relay operation it started
    /// has completed and been written.
    pub async fn run<R, W>(&self, input: R, output: W)
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Send + 'static,
    {
        let emitter = Emitter::new(output);
        let mut lines = FramedRead::new(input, LineCodec::new());

        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "Failed to read input; treating as closed");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match jsonrpc::decode_line(&line) {
                Ok(message) => self.spawn_relay(message, &emitter),
                Err(e) => debug!(error = %e, "Failed to parse input"),
            }
        }

        self.lifecycle.close_input();
        self.lifecycle.drained().await;
        info!("All requests completed, shutting down");
    }

    fn spawn_relay(&self, message: Value, emitter: &Emitter) {
        // Counted before the task exists so input closing can't overtake it.
        let in_flight = self.lifecycle.begin();
        let client = Arc::clone(&self.client);
        let limiter = self.limiter.clone();
        let emitter = emitter.clone();

        tokio::spawn(async move {
            let _in_flight = in_flight;
            let _permit = match limiter {
                Some(limiter) => limiter.acquire_owned().await.ok(),
                None => None,
            };
            relay_message(&client, &emitter, message).await;
        });
    }
}

/// One relay operation. Never fails: any upstream error becomes a single
/// JSON-RPC error envelope on the output.
pub async fn relay_message(client: &UpstreamClient, emitter: &Emitter, message: Value) {
    let id = jsonrpc::request_id(&message);
    if let Err(e) = forward(client, emitter, &message).await {
        warn!(%id, error = %e, "Relay failed");
        let envelope = jsonrpc::error_response(&id, INTERNAL_ERROR, &e.to_string());
        emit(emitter, &envelope).await;
    }
}

async fn forward(
    client: &UpstreamClient,
    emitter: &Emitter,
    message: &Value,
) -> Result<(), UpstreamError> {
    debug!(endpoint = client.endpoint(), %message, "Sending request");
    let mut response = client.post(message).await?;

    if response.is_event_stream() {
        debug!("Received SSE response");
        let mut decoder = SseDecoder::new();
        while let Some(chunk) = response.chunk().await? {
            for event in decoder.push(&chunk) {
                debug!(%event, "Received SSE event");
                emit(emitter, &event).await;
            }
        }
        decoder.finish();
    } else {
        let body = response.json().await?;
        debug!(%body, "Received JSON response");
        emit(emitter, &body).await;
    }
    Ok(())
}

async fn emit(emitter: &Emitter, value: &Value) {
    if let Err(e) = emitter.emit(value).await {
        warn!(error = %e, "Failed to write output");
    }
}
