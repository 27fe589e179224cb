//! The shared chat connection.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures_util::StreamExt;
use serde_json::Value;
use terno_shared::{Message, MessageKind, NotificationStatus};

use super::registry::{SubscriptionId, SubscriptionRegistry};
use super::transport::{default_connector, Connector, TransportCommand, TransportEvent};
use super::{ConnectionState, ReconnectConfig};
use crate::config::ClientConfig;
use crate::error::ChatError;
use crate::runtime;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to the one logical connection to the agent chat endpoint.
///
/// Construct it once at the application root and hand clones to views; all
/// clones share the same transport, state and subscriptions. Must be used
/// from within a tokio runtime on native targets.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<Inner>,
}

struct Inner {
    url: String,
    reconnect: ReconnectConfig,
    connector: Arc<dyn Connector>,
    link: Mutex<Link>,
    registry: Mutex<SubscriptionRegistry>,
    watchers: Mutex<Vec<UnboundedSender<ConnectionState>>>,
}

/// Connection bookkeeping guarded by one lock.
#[derive(Default)]
struct Link {
    state: ConnectionState,
    /// Bumped for every transport opened; events tagged with an older value are stale.
    generation: u64,
    commands: Option<UnboundedSender<TransportCommand>>,
    attempt: u32,
    reconnect_pending: bool,
}

enum Flow {
    Continue,
    Stop,
}

impl ChatClient {
    pub fn new(config: ClientConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            inner: Arc::new(Inner {
                url: config.endpoint().to_string(),
                reconnect: config.reconnect,
                connector,
                link: Mutex::new(Link::default()),
                registry: Mutex::new(SubscriptionRegistry::new()),
                watchers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Client using the platform's WebSocket implementation.
    pub fn from_config(config: ClientConfig) -> Self {
        Self::new(config, default_connector())
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    pub fn state(&self) -> ConnectionState {
        lock(&self.inner.link).state.clone()
    }

    pub fn is_connected(&self) -> bool {
        lock(&self.inner.link).state.is_connected()
    }

    /// Whether both handles refer to the same connection.
    pub fn ptr_eq(&self, other: &ChatClient) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Stream of state transitions, starting with the current state.
    pub fn watch_state(&self) -> UnboundedReceiver<ConnectionState> {
        let (tx, rx) = unbounded();
        let link = lock(&self.inner.link);
        let _ = tx.unbounded_send(link.state.clone());
        lock(&self.inner.watchers).push(tx);
        rx
    }

    /// Open the transport unless it is already open or opening.
    ///
    /// Returns immediately; the outcome is reported through state changes and
    /// notification messages. Calling this after the retry budget ran out starts
    /// a fresh budget.
    pub fn connect(&self) {
        {
            let mut link = lock(&self.inner.link);
            if matches!(link.state, ConnectionState::Failed { .. }) {
                link.attempt = 0;
            }
        }
        self.open_transport();
    }

    fn open_transport(&self) {
        let (generation, events) = {
            let mut link = lock(&self.inner.link);
            if link.state.is_active() {
                crate::log_debug!("connect() ignored, connection is {}", link.state);
                return;
            }

            if let Some(previous) = link.commands.take() {
                let _ = previous.unbounded_send(TransportCommand::Close);
            }

            link.generation += 1;
            let generation = link.generation;
            let (commands, events) = self.inner.connector.open(&self.inner.url).into_parts();
            link.commands = Some(commands);
            self.set_state(&mut link, ConnectionState::Connecting);
            crate::log_info!("Connecting to {} (transport #{})", self.inner.url, generation);
            (generation, events)
        };

        let weak = Arc::downgrade(&self.inner);
        runtime::spawn(pump(weak, generation, events));
    }

    /// Publish a message. Fails without writing anything unless the connection is open.
    pub fn send(
        &self,
        kind: MessageKind,
        text: impl Into<String>,
        data: Option<Value>,
    ) -> Result<(), ChatError> {
        self.send_message(&Message::new(kind, text, data))
    }

    pub fn send_chat_message(&self, text: impl Into<String>) -> Result<(), ChatError> {
        self.send(MessageKind::Chat, text, None)
    }

    pub fn send_message(&self, message: &Message) -> Result<(), ChatError> {
        let link = lock(&self.inner.link);
        if !link.state.is_connected() {
            crate::log_warn!("Dropping {} message, connection is {}", message.kind(), link.state);
            return Err(ChatError::NotConnected {
                state: link.state.clone(),
            });
        }
        let frame = message.encode()?;
        let commands = link.commands.as_ref().ok_or(ChatError::TransportClosed)?;
        commands
            .unbounded_send(TransportCommand::Send(frame))
            .map_err(|_| ChatError::TransportClosed)
    }

    /// Register `handler` for every inbound message of `kind`.
    pub fn subscribe<F>(&self, kind: MessageKind, handler: F) -> SubscriptionId
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        lock(&self.inner.registry).insert(kind, Arc::new(handler))
    }

    /// Remove one registration. Unknown ids are ignored and yield `false`.
    pub fn unsubscribe(&self, kind: MessageKind, id: SubscriptionId) -> bool {
        lock(&self.inner.registry).remove(kind, id)
    }

    pub fn subscriber_count(&self, kind: MessageKind) -> usize {
        lock(&self.inner.registry).count(kind)
    }

    fn set_state(&self, link: &mut Link, state: ConnectionState) {
        if link.state == state {
            return;
        }
        link.state = state;
        lock(&self.inner.watchers).retain(|tx| tx.unbounded_send(link.state.clone()).is_ok());
    }

    fn handle_event(&self, generation: u64, event: TransportEvent) -> Flow {
        let mut link = lock(&self.inner.link);
        if link.generation != generation {
            crate::log_debug!("Ignoring {:?} from discarded transport #{}", event, generation);
            return Flow::Stop;
        }

        match event {
            TransportEvent::Opened => {
                link.attempt = 0;
                self.set_state(&mut link, ConnectionState::Open);
                crate::log_info!("Connected to {}", self.inner.url);
                Flow::Continue
            }
            TransportEvent::Frame(frame) => {
                drop(link);
                match Message::decode(&frame) {
                    Ok(message) => self.dispatch(&message),
                    Err(e) => crate::log_warn!("Dropping malformed frame: {} ({})", e, frame),
                }
                Flow::Continue
            }
            TransportEvent::Error(reason) => {
                self.set_state(&mut link, ConnectionState::Errored);
                drop(link);
                crate::log_error!("Connection to {} failed: {}", self.inner.url, reason);
                self.dispatch(&Message::notification(
                    NotificationStatus::Error,
                    format!("Connection error: {reason}"),
                ));
                self.schedule_reconnect();
                Flow::Continue
            }
            TransportEvent::Closed { reason } => {
                link.commands = None;
                self.set_state(&mut link, ConnectionState::Closed);
                drop(link);
                crate::log_info!(
                    "Connection to {} closed ({})",
                    self.inner.url,
                    reason.as_deref().unwrap_or("no reason")
                );
                self.schedule_reconnect();
                Flow::Stop
            }
        }
    }

    /// Deliver `message` to a snapshot of its subscribers, isolating panics.
    fn dispatch(&self, message: &Message) {
        let kind = message.kind();
        let handlers = lock(&self.inner.registry).snapshot(kind);
        for (id, handler) in handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(message))).is_err() {
                crate::log_error!("Subscriber {} for {} messages panicked", id, kind);
            }
        }
    }

    fn schedule_reconnect(&self) {
        let (delay, attempt) = {
            let mut link = lock(&self.inner.link);
            if link.reconnect_pending {
                return;
            }
            if self.inner.reconnect.exhausted(link.attempt) {
                let reason = format!(
                    "gave up after {} reconnect attempts",
                    self.inner.reconnect.max_attempts
                );
                // Retire the transport so its trailing events are treated as stale.
                if let Some(commands) = link.commands.take() {
                    let _ = commands.unbounded_send(TransportCommand::Close);
                }
                link.generation += 1;
                self.set_state(&mut link, ConnectionState::Failed { reason: reason.clone() });
                drop(link);
                crate::log_error!("Connection to {} {}", self.inner.url, reason);
                self.dispatch(&Message::notification(
                    NotificationStatus::Error,
                    format!("Connection lost: {reason}"),
                ));
                return;
            }
            let delay = self.inner.reconnect.delay_for_attempt(link.attempt);
            link.attempt += 1;
            link.reconnect_pending = true;
            (delay, link.attempt)
        };

        crate::log_info!(
            "Reconnecting to {} in {}ms (attempt {})",
            self.inner.url,
            delay.as_millis(),
            attempt
        );

        let weak = Arc::downgrade(&self.inner);
        runtime::spawn(async move {
            runtime::sleep(delay).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let client = ChatClient { inner };
            lock(&client.inner.link).reconnect_pending = false;
            client.open_transport();
        });
    }
}

/// Feed one transport's events into the client until it closes or is replaced.
async fn pump(
    inner: Weak<Inner>,
    generation: u64,
    mut events: UnboundedReceiver<TransportEvent>,
) {
    while let Some(event) = events.next().await {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let client = ChatClient { inner };
        if let Flow::Stop = client.handle_event(generation, event) {
            return;
        }
    }

    // The transport went away without reporting a close.
    if let Some(inner) = inner.upgrade() {
        ChatClient { inner }.handle_event(
            generation,
            TransportEvent::Closed {
                reason: Some("transport dropped".to_string()),
            },
        );
    }
}

impl PartialEq for ChatClient {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("url", &self.inner.url)
            .field("state", &self.state())
            .finish()
    }
}
