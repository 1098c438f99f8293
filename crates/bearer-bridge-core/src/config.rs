//! Configuration for the bridge.
//!
//! Values are resolved once at startup (command line first, then the
//! `MCP_*` environment variables) and never change afterwards.

use std::fmt;

use crate::error::{Error, Result};

/// Environment variable naming the upstream endpoint.
pub const ENDPOINT_VAR: &str = "MCP_URL";
/// Environment variable carrying the bearer token.
pub const TOKEN_VAR: &str = "MCP_TOKEN";

/// Resolved bridge configuration.
#[derive(Clone)]
pub struct BridgeConfig {
    /// Upstream URL every message is POSTed to.
    pub endpoint: String,
    /// Bearer credential sent in the `Authorization` header.
    pub token: String,
    /// Write diagnostics to stderr.
    pub debug: bool,
    /// Emit diagnostics as JSON lines instead of the human-readable format.
    pub log_json: bool,
    /// Ceiling on concurrently executing relay operations (`None` = unlimited).
    pub max_in_flight: Option<usize>,
}

impl BridgeConfig {
    /// Validate the two required settings.
    ///
    /// Empty strings count as missing. The endpoint is checked first so the
    /// diagnostic always names the first absent value.
    pub fn new(endpoint: Option<String>, token: Option<String>) -> Result<Self> {
        let endpoint = endpoint
            .filter(|s| !s.trim().is_empty())
            .ok_or(Error::MissingConfig(ENDPOINT_VAR))?;
        let token = token
            .filter(|s| !s.trim().is_empty())
            .ok_or(Error::MissingConfig(TOKEN_VAR))?;

        Ok(Self {
            endpoint,
            token,
            debug: false,
            log_json: false,
            max_in_flight: None,
        })
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub const fn with_log_json(mut self, log_json: bool) -> Self {
        self.log_json = log_json;
        self
    }

    /// Cap concurrent relay operations. `0` means unlimited.
    #[must_use]
    pub fn with_max_in_flight(mut self, max: Option<usize>) -> Self {
        self.max_in_flight = max.filter(|&n| n > 0);
        self
    }
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .field("debug", &self.debug)
            .field("log_json", &self.log_json)
            .field("max_in_flight", &self.max_in_flight)
            .finish()
    }
}
