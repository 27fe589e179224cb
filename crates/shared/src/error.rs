//! Errors raised at the wire boundary.

use thiserror::Error;

/// Failure to move a [`crate::Message`] across the wire.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The inbound frame was not valid JSON or did not match any known message shape.
    #[error("failed to decode frame: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ProtocolError {
    pub fn is_decode(&self) -> bool {
        matches!(self, ProtocolError::Decode(_))
    }
}
