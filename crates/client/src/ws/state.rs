use std::fmt;

/// Lifecycle state of the chat connection.
///
/// `Idle` until the first `connect()`. `Errored` and `Closed` lead back to
/// `Connecting` once the reconnect delay elapses. `Failed` is only reached when
/// a finite retry budget is configured and exhausted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Open,
    Errored,
    Closed,
    Failed { reason: String },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectionState::Connecting)
    }

    /// A transport is open or being opened; `connect()` is a no-op in these states.
    pub fn is_active(&self) -> bool {
        self.is_connected() || self.is_connecting()
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Errored => "errored",
            ConnectionState::Closed => "closed",
            ConnectionState::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Failed { reason } => write!(f, "failed: {reason}"),
            other => f.write_str(other.label()),
        }
    }
}
