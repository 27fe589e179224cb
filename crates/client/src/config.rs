//! Client configuration.
//!
//! Native builds read the environment:
//! - `TERNO_WS_URL`: agent endpoint (default: `ws://localhost:8000/ws/agent/`)
//! - `TERNO_RECONNECT_DELAY_MS`: delay before the first reconnect attempt (default: 5000)
//! - `TERNO_RECONNECT_MAX_ATTEMPTS`: give up after this many attempts (default: 0, never)
//!
//! Web builds derive the endpoint from the page origin instead.

use std::time::Duration;

use terno_shared::AGENT_WS_PATH;
use url::Url;

use crate::error::ConfigError;
use crate::ws::ReconnectConfig;

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8000/ws/agent/";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    endpoint: String,
    pub reconnect: ReconnectConfig,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ConfigError> {
        let endpoint = endpoint.into();
        let parsed = Url::parse(&endpoint).map_err(|source| ConfigError::InvalidUrl {
            url: endpoint.clone(),
            source,
        })?;
        if !matches!(parsed.scheme(), "ws" | "wss") {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }
        Ok(Self {
            endpoint,
            reconnect: ReconnectConfig::default(),
        })
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = lookup("TERNO_WS_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let mut config = Self::new(endpoint)?;

        if let Some(raw) = lookup("TERNO_RECONNECT_DELAY_MS") {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "TERNO_RECONNECT_DELAY_MS",
                    value: raw.clone(),
                })?;
            config.reconnect.initial_delay = Duration::from_millis(millis);
            config.reconnect.max_delay = config.reconnect.max_delay.max(config.reconnect.initial_delay);
        }

        if let Some(raw) = lookup("TERNO_RECONNECT_MAX_ATTEMPTS") {
            config.reconnect.max_attempts =
                raw.trim()
                    .parse::<u32>()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "TERNO_RECONNECT_MAX_ATTEMPTS",
                        value: raw.clone(),
                    })?;
        }

        Ok(config)
    }

    /// Endpoint on the same origin as the current page.
    #[cfg(target_arch = "wasm32")]
    pub fn from_location() -> Result<Self, ConfigError> {
        let origin = web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .ok_or(ConfigError::NoLocation)?;
        Self::new(endpoint_for_origin(&origin))
    }
}

/// Convert an HTTP(S) origin to the agent WebSocket URL on that origin.
pub fn endpoint_for_origin(origin: &str) -> String {
    let ws_origin = if let Some(rest) = origin.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = origin.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        origin.to_string()
    };
    format!("{}{}", ws_origin.trim_end_matches('/'), AGENT_WS_PATH)
}
