//! Diagnostic logging initialization.
//!
//! Stdout carries protocol traffic, so every layer here writes to stderr.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "mcp_bearer_bridge=debug,bearer_bridge=debug,bearer_bridge_core=debug";

/// Initialise the global tracing subscriber.
///
/// * `enabled` -- when `false` no subscriber is installed and every
///   diagnostic is discarded.
/// * `default_filter` -- default `RUST_LOG` value when the env-var is not set.
/// * `log_json` -- when `true`, emit structured JSON log lines instead of the
///   human-readable format.
pub fn init_tracing(enabled: bool, default_filter: &str, log_json: bool) {
    if !enabled {
        return;
    }
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );
    if log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
