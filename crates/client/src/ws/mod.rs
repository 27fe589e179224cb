//! Realtime messaging with the agent chat endpoint.
//!
//! This module provides:
//! - One shared connection with auto-reconnect ([`ChatClient`])
//! - Publish/subscribe by message kind ([`SubscriptionRegistry`])
//! - Platform transports behind the [`Connector`] trait
//! - A provider component and hooks for views
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 ChatProvider                 │
//! │  (app root, owns the ChatClient in context)  │
//! └──────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌───────────────────┐      ┌─────────────┐
//!              │    ChatClient     │◀────▶│  Connector  │──▶ /ws/agent/
//!              │ state + registry  │      │ (transport) │
//!              └───────────────────┘      └─────────────┘
//!                        │ dispatch by MessageKind
//!          ┌─────────────┼─────────────┐
//!          ▼             ▼             ▼
//!     chat view     status bar     any subscriber
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let client = ChatClient::from_config(ClientConfig::from_env()?);
//! let id = client.subscribe(MessageKind::Chat, |msg| println!("bot: {}", msg.text()));
//! client.connect();
//! // later, once the state is Open
//! client.send_chat_message("How many sales last month?")?;
//! client.unsubscribe(MessageKind::Chat, id);
//! ```

mod client;
mod hooks;
mod provider;
mod reconnect;
mod registry;
mod state;
pub mod transport;

pub use client::ChatClient;
pub use reconnect::ReconnectConfig;
pub use registry::{Handler, SubscriptionId, SubscriptionRegistry};
pub use state::ConnectionState;
pub use transport::{
    default_connector, Connector, TransportCommand, TransportEnds, TransportEvent,
    TransportHandle,
};

pub use hooks::{use_chat_client, use_connection_state, use_conversation};
pub use provider::ChatProvider;
