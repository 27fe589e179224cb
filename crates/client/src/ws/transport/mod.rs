//! Transport abstraction between the chat client and a concrete socket.
//!
//! A [`Connector`] starts opening a socket and immediately returns a
//! [`TransportHandle`]. The handle carries two channels: commands flow from the
//! client to the socket task, lifecycle [`TransportEvent`]s flow back. Keeping
//! the socket behind channels lets the web implementation own its `!Send`
//! `WebSocket` inside a local task while the client stays platform neutral.

use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use std::sync::Arc;

/// Lifecycle notification from a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Frame(String),
    Error(String),
    Closed { reason: Option<String> },
}

/// Instruction for the socket task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCommand {
    Send(String),
    Close,
}

/// Client side of one transport attempt.
#[derive(Debug)]
pub struct TransportHandle {
    commands: UnboundedSender<TransportCommand>,
    events: UnboundedReceiver<TransportEvent>,
}

/// Socket side of one transport attempt.
#[derive(Debug)]
pub struct TransportEnds {
    pub commands: UnboundedReceiver<TransportCommand>,
    pub events: UnboundedSender<TransportEvent>,
}

impl TransportHandle {
    /// Create a connected handle/ends pair.
    pub fn pair() -> (TransportHandle, TransportEnds) {
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();
        (
            TransportHandle {
                commands: command_tx,
                events: event_rx,
            },
            TransportEnds {
                commands: command_rx,
                events: event_tx,
            },
        )
    }

    pub fn into_parts(
        self,
    ) -> (
        UnboundedSender<TransportCommand>,
        UnboundedReceiver<TransportEvent>,
    ) {
        (self.commands, self.events)
    }
}

impl TransportEnds {
    /// Report an event to the client. Returns false once the client has let go.
    pub fn emit(&self, event: TransportEvent) -> bool {
        self.events.unbounded_send(event).is_ok()
    }
}

/// Opens transports to a URL.
pub trait Connector: Send + Sync + 'static {
    /// Begin opening a transport. Must not block; progress is reported through
    /// the handle's events.
    fn open(&self, url: &str) -> TransportHandle;
}

#[cfg(not(target_arch = "wasm32"))]
mod transport_native;
#[cfg(not(target_arch = "wasm32"))]
pub use transport_native::TungsteniteConnector;

#[cfg(target_arch = "wasm32")]
mod transport_wasm;
#[cfg(target_arch = "wasm32")]
pub use transport_wasm::WebSysConnector;

/// The socket implementation for the current platform.
pub fn default_connector() -> Arc<dyn Connector> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Arc::new(TungsteniteConnector)
    }
    #[cfg(target_arch = "wasm32")]
    {
        Arc::new(WebSysConnector)
    }
}
