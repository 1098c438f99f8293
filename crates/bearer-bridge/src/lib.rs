//! Bearer bridge library
//!
//! Relays newline-delimited JSON-RPC from a local stream to an authenticated
//! HTTP endpoint and writes the answers back, one JSON value per line:
//! - Upstream HTTP client with JSON and SSE response handling
//! - Line-atomic response emitter
//! - In-flight tracking and drain-on-close lifecycle
//! - The relay pipeline tying them together

pub mod relay;
pub mod upstream;

pub use relay::{Bridge, Emitter, Lifecycle, Phase};
pub use upstream::{UpstreamClient, UpstreamError};
