//! Relay pipeline: input framing, per-message upstream dispatch, output
//! emission and shutdown coordination.

mod emitter;
mod lifecycle;
mod pipeline;

pub use emitter::Emitter;
pub use lifecycle::{InFlight, Lifecycle, Phase};
pub use pipeline::{Bridge, relay_message};
