//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

/// Frontend serving mode configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontendMode {
    /// Serve the built web client from a directory.
    Static { dir: String },
    /// No frontend serving - agent endpoint only.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Pause between streamed agent steps.
    pub step_delay: Duration,
    pub frontend: FrontendMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            step_delay: Duration::from_secs(2),
            frontend: FrontendMode::Disabled,
        }
    }
}

impl ServerConfig {
    /// Environment variables:
    /// - `TERNO_BIND_ADDR`: listen address (default: "0.0.0.0:8000")
    /// - `TERNO_AGENT_STEP_DELAY_MS`: delay between agent steps (default: 2000)
    /// - `TERNO_STATIC_DIR`: serve the web client from this directory (default: unset, disabled)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(addr) = lookup("TERNO_BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .with_context(|| format!("invalid TERNO_BIND_ADDR {addr:?}"))?;
        }

        if let Some(delay) = lookup("TERNO_AGENT_STEP_DELAY_MS") {
            let millis: u64 = delay
                .trim()
                .parse()
                .with_context(|| format!("invalid TERNO_AGENT_STEP_DELAY_MS {delay:?}"))?;
            config.step_delay = Duration::from_millis(millis);
        }

        if let Some(dir) = lookup("TERNO_STATIC_DIR").filter(|d| !d.trim().is_empty()) {
            config.frontend = FrontendMode::Static { dir };
        }

        Ok(config)
    }
}
