//! Bearer bridge core library
//!
//! Shared, I/O-free building blocks for the bridge:
//! - Configuration validation
//! - JSON-RPC envelope helpers
//! - Universal-newline line framing and SSE de-framing
//! - Common error types and tracing setup

pub mod config;
pub mod error;
pub mod framing;
pub mod jsonrpc;
pub mod tracing_init;

pub use config::BridgeConfig;
pub use error::{Error, Result};
