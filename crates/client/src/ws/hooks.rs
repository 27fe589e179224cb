//! Chat hooks for Dioxus components.
//!
//! Views never touch the transport. They read the shared [`ChatClient`] from
//! context and mirror what they need into signals.

use dioxus::prelude::*;
use futures_channel::mpsc::unbounded;
use futures_util::StreamExt;
use terno_shared::{Message, MessageKind};

use super::client::ChatClient;
use super::state::ConnectionState;
use crate::stores::Conversation;

/// The client provided by the nearest [`super::ChatProvider`].
pub fn use_chat_client() -> ChatClient {
    use_context::<ChatClient>()
}

/// Connection state, updated on every transition.
pub fn use_connection_state() -> Signal<ConnectionState> {
    let client = use_chat_client();
    let mut state = use_signal(|| client.state());

    use_hook(move || {
        let mut updates = client.watch_state();
        spawn(async move {
            while let Some(next) = updates.next().await {
                state.set(next);
            }
        });
    });

    state
}

/// Conversation log fed by inbound chat messages for as long as the component lives.
///
/// Outbound turns are recorded with [`Conversation::send`].
pub fn use_conversation() -> Signal<Conversation> {
    let client = use_chat_client();
    let mut conversation = use_signal(Conversation::new);

    let subscriber = client.clone();
    let subscription = use_hook(move || {
        // Handlers may run on a transport thread; hop onto the UI task before touching signals.
        let (tx, mut rx) = unbounded::<Message>();
        let id = subscriber.subscribe(MessageKind::Chat, move |message: &Message| {
            let _ = tx.unbounded_send(message.clone());
        });
        spawn(async move {
            while let Some(message) = rx.next().await {
                conversation.write().push_bot(message.text());
            }
        });
        id
    });

    use_drop(move || {
        client.unsubscribe(MessageKind::Chat, subscription);
    });

    conversation
}
