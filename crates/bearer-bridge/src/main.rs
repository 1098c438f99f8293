//! MCP bearer bridge
//!
//! Bridges a stdio JSON-RPC client (e.g. a desktop MCP host) to an HTTP MCP
//! server that requires bearer-token authentication.

use clap::Parser;
use clap::builder::FalseyValueParser;
use tracing::info;

use bearer_bridge::Bridge;
use bearer_bridge_core::tracing_init::{DEFAULT_FILTER, init_tracing};
use bearer_bridge_core::{BridgeConfig, Error};

#[derive(Parser, Debug)]
#[command(name = "mcp-bearer-bridge")]
#[command(version, about = "Relay stdio JSON-RPC to an HTTP MCP server with bearer auth")]
struct Args {
    /// Upstream MCP endpoint URL
    #[arg(long, env = "MCP_URL")]
    url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = "MCP_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Write diagnostics to stderr
    #[arg(long, env = "MCP_DEBUG", value_parser = FalseyValueParser::new())]
    debug: bool,

    /// Output diagnostics as JSON lines
    #[arg(long, env = "MCP_LOG_JSON", value_parser = FalseyValueParser::new())]
    log_json: bool,

    /// Maximum concurrently executing relay operations (0 = unlimited)
    #[arg(long, env = "MCP_MAX_IN_FLIGHT")]
    max_in_flight: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match BridgeConfig::new(args.url, args.token) {
        Ok(config) => config
            .with_debug(args.debug)
            .with_log_json(args.log_json)
            .with_max_in_flight(args.max_in_flight),
        Err(e) => exit_with_config_error(&e),
    };

    init_tracing(config.debug, DEFAULT_FILTER, config.log_json);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        endpoint = %config.endpoint,
        max_in_flight = ?config.max_in_flight,
        "MCP bearer bridge started"
    );

    let bridge = Bridge::new(&config)?;

    // Both handlers are installed before any input is read.
    #[cfg(unix)]
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
    #[cfg(unix)]
    let sigint_future = sigint.recv();
    #[cfg(not(unix))]
    let sigint_future = tokio::signal::ctrl_c();

    #[cfg(unix)]
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    #[cfg(unix)]
    let sigterm_future = sigterm.recv();
    #[cfg(not(unix))]
    let sigterm_future = std::future::pending::<Option<()>>();

    // Signals stop the process at once; in-flight relays are abandoned.
    tokio::select! {
        () = bridge.run(tokio::io::stdin(), tokio::io::stdout()) => {}
        _ = sigint_future => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm_future => {
            info!("Received SIGTERM, shutting down");
        }
    }

    // Stdin is read on a blocking thread that would keep the runtime alive.
    std::process::exit(0)
}

#[allow(clippy::print_stderr)]
fn exit_with_config_error(err: &Error) -> ! {
    eprintln!("Error: {err}");
    std::process::exit(1)
}
