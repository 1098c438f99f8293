//! Incremental framers for the two byte streams the bridge consumes.
//!
//! Both tolerate arbitrary chunk boundaries: a frame is only produced once
//! its terminator has been seen.

mod lines;
mod sse;

pub use lines::LineCodec;
pub use sse::{DATA_PREFIX, DONE_SENTINEL, SseDecoder};
