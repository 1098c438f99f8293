//! JSON-RPC envelope helpers.
//!
//! The bridge treats inbound messages as opaque JSON. The only member it
//! ever looks at is `id`, used to correlate synthesized error responses.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// JSON-RPC protocol version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC "internal error" code, used for every relay failure.
pub const INTERNAL_ERROR: i64 = -32603;

/// Parse one non-blank input line into an inbound message.
///
/// Any JSON document is accepted; no JSON-RPC shape checks are made.
pub fn decode_line(line: &str) -> Result<Value> {
    Ok(serde_json::from_str(line.trim())?)
}

/// The `id` of a message, or `null` if it has none.
pub fn request_id(message: &Value) -> Value {
    message.get("id").cloned().unwrap_or(Value::Null)
}

#[derive(Debug, Serialize)]
struct ErrorResponse<'a> {
    jsonrpc: &'static str,
    id: &'a Value,
    error: ErrorObject<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorObject<'a> {
    code: i64,
    message: &'a str,
}

/// Build a JSON-RPC error response envelope.
pub fn error_response(id: &Value, code: i64, message: &str) -> Value {
    serde_json::to_value(ErrorResponse {
        jsonrpc: JSONRPC_VERSION,
        id,
        error: ErrorObject { code, message },
    })
    .unwrap_or(Value::Null)
}
