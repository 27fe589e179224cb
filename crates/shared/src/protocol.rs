//! Agent chat wire protocol.
//!
//! Every frame is a JSON object with a `type` discriminator and a `message`
//! text payload:
//!
//! ```json
//! {"type": "chat", "message": "How many sales last month?"}
//! {"type": "notification", "status": "error", "message": "Connection error"}
//! ```
//!
//! An optional `data` value may accompany either kind. Frames are decoded into
//! [`Message`] at the transport boundary, so anything that does not match one of
//! the known shapes is rejected before it reaches a subscriber.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// Path of the agent chat endpoint.
pub const AGENT_WS_PATH: &str = "/ws/agent/";

/// Category tag of a message, used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Chat,
    Notification,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Chat => "chat",
            MessageKind::Notification => "notification",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity carried by notification messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    #[default]
    Info,
    Error,
}

/// A decoded application-level message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Chat {
        #[serde(rename = "message")]
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
    Notification {
        #[serde(default)]
        status: NotificationStatus,
        #[serde(rename = "message")]
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
}

impl Message {
    /// Build a message of the given kind. Notifications built this way are informational.
    pub fn new(kind: MessageKind, text: impl Into<String>, data: Option<Value>) -> Self {
        let text = text.into();
        match kind {
            MessageKind::Chat => Message::Chat { text, data },
            MessageKind::Notification => Message::Notification {
                status: NotificationStatus::Info,
                text,
                data,
            },
        }
    }

    pub fn chat(text: impl Into<String>) -> Self {
        Message::Chat {
            text: text.into(),
            data: None,
        }
    }

    pub fn notification(status: NotificationStatus, text: impl Into<String>) -> Self {
        Message::Notification {
            status,
            text: text.into(),
            data: None,
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Chat { .. } => MessageKind::Chat,
            Message::Notification { .. } => MessageKind::Notification,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Message::Chat { text, .. } | Message::Notification { text, .. } => text,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Message::Chat { data, .. } | Message::Notification { data, .. } => data.as_ref(),
        }
    }

    /// Notification status, `None` for chat messages.
    pub fn status(&self) -> Option<NotificationStatus> {
        match self {
            Message::Chat { .. } => None,
            Message::Notification { status, .. } => Some(*status),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status() == Some(NotificationStatus::Error)
    }

    /// Serialize into a text frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// Parse a text frame.
    pub fn decode(frame: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(frame).map_err(ProtocolError::Decode)
    }
}
