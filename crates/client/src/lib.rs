//! Terno Client - realtime agent chat
//!
//! This crate contains the connection layer used by the Terno chat views:
//! a single shared WebSocket connection to the agent endpoint with
//! publish/subscribe by message kind and automatic reconnection.

pub mod logging;

pub mod config;
pub mod error;
pub mod runtime;
pub mod stores;
pub mod ws;

pub use config::ClientConfig;
pub use error::{ChatError, ConfigError};
pub use stores::{ChatTurn, Conversation, Role};
pub use terno_shared::{Message, MessageKind, NotificationStatus};
pub use ws::{ChatClient, ChatProvider, ConnectionState, ReconnectConfig, SubscriptionId};
