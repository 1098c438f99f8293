//! Server-sent-event demultiplexer.
//!
//! Only `data: ` lines are consumed; each one carrying a JSON payload becomes
//! an independent message. Event names, ids, comments and the blank lines
//! separating events are ignored.

use serde_json::Value;
use tracing::debug;

/// Prefix of an SSE data line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload marking the end of a stream; never forwarded.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Incremental SSE decoder.
///
/// Bytes are buffered until a `\n` completes a line, so neither lines nor
/// multi-byte characters split across chunks are lost or duplicated.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Feed one body chunk, returning the events it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Value> {
        self.buffer.extend_from_slice(chunk);
        let Some(last_newline) = self.buffer.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };
        let complete: Vec<u8> = self.buffer.drain(..=last_newline).collect();
        complete.split(|&b| b == b'\n').filter_map(decode_line).collect()
    }

    /// Bytes held back waiting for a line terminator.
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// End of stream. The unterminated remainder is discarded, never parsed;
    /// returns its length.
    pub fn finish(self) -> usize {
        let discarded = self.buffer.len();
        if discarded > 0 {
            debug!(bytes = discarded, "Discarding unterminated SSE remainder");
        }
        discarded
    }
}

fn decode_line(raw: &[u8]) -> Option<Value> {
    let text = String::from_utf8_lossy(raw);
    let line = text.strip_suffix('\r').unwrap_or(&text);
    let payload = line.strip_prefix(DATA_PREFIX)?;
    if payload == DONE_SENTINEL {
        return None;
    }
    match serde_json::from_str(payload) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, payload, "Failed to parse SSE data");
            None
        }
    }
}
