//! Subscription registry keyed by message kind.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use terno_shared::{Message, MessageKind};

/// Callback invoked for every inbound message of the subscribed kind.
pub type Handler = Arc<dyn Fn(&Message) + Send + Sync>;

/// Opaque handle identifying one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Ordered handler lists per message kind.
///
/// Dispatch works on a [`snapshot`](Self::snapshot) so that handlers may add or
/// remove registrations while a message is being delivered.
#[derive(Default)]
pub struct SubscriptionRegistry {
    next_id: u64,
    handlers: HashMap<MessageKind, Vec<(SubscriptionId, Handler)>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: MessageKind, handler: Handler) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.handlers.entry(kind).or_default().push((id, handler));
        id
    }

    /// Remove one registration. Returns false if it was not registered.
    pub fn remove(&mut self, kind: MessageKind, id: SubscriptionId) -> bool {
        let Some(list) = self.handlers.get_mut(&kind) else {
            return false;
        };
        let Some(pos) = list.iter().position(|(existing, _)| *existing == id) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.handlers.remove(&kind);
        }
        true
    }

    /// Handlers for `kind` in registration order.
    pub fn snapshot(&self, kind: MessageKind) -> Vec<(SubscriptionId, Handler)> {
        self.handlers
            .get(&kind)
            .map(|list| list.to_vec())
            .unwrap_or_default()
    }

    pub fn count(&self, kind: MessageKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("chat", &self.count(MessageKind::Chat))
            .field("notification", &self.count(MessageKind::Notification))
            .finish()
    }
}
