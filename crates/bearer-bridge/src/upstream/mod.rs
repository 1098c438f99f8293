//! Authenticated HTTP upstream.

mod client;

pub use client::{ACCEPT_VALUE, EVENT_STREAM, UpstreamClient, UpstreamError, UpstreamResponse};
