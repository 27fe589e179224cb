//! Client error types.

use terno_shared::ProtocolError;
use thiserror::Error;

use crate::ws::ConnectionState;

/// Failure to publish a chat message.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The transport is not open; nothing was written.
    #[error("message not sent: connection is {state}")]
    NotConnected { state: ConnectionState },
    #[error("message not sent: transport closed")]
    TransportClosed,
    #[error("message is empty")]
    EmptyMessage,
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Invalid client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported endpoint scheme {0:?}, expected ws or wss")]
    UnsupportedScheme(String),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("browser location unavailable")]
    NoLocation,
}
