//! Provider and hooks mounted in a headless `VirtualDom`.

mod support;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dioxus::dioxus_core::{NoOpMutations, VirtualDom};
use dioxus::prelude::*;
use support::{client, frame, settle};
use terno_client::ws::{use_conversation, TransportEvent};
use terno_client::{ChatClient, ChatProvider, ChatTurn, Message, MessageKind, Role};

/// Latest transcript rendered by [`Transcript`].
#[derive(Clone, Default)]
struct TurnLog(Arc<Mutex<Vec<ChatTurn>>>);

impl TurnLog {
    fn turns(&self) -> Vec<ChatTurn> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct Harness {
    client: ChatClient,
    log: TurnLog,
}

fn app(props: Harness) -> Element {
    use_context_provider(|| props.log.clone());
    rsx! {
        ChatProvider { client: props.client.clone(), Transcript {} }
    }
}

#[component]
fn Transcript() -> Element {
    let conversation = use_conversation();
    let log = use_context::<TurnLog>();
    *log.0.lock().unwrap() = conversation.read().turns().to_vec();
    rsx! {}
}

async fn render_pending(dom: &mut VirtualDom) {
    tokio::time::timeout(Duration::from_secs(5), dom.wait_for_work())
        .await
        .expect("no work was scheduled");
    dom.render_immediate(&mut NoOpMutations);
}

#[tokio::test]
async fn provider_connects_once_and_conversation_follows_chat_messages() {
    let (client, connector) = client();
    let log = TurnLog::default();
    let mut dom = VirtualDom::new_with_props(
        app,
        Harness {
            client: client.clone(),
            log: log.clone(),
        },
    );
    dom.rebuild_in_place();

    assert_eq!(connector.open_count(), 1);
    assert_eq!(client.subscriber_count(MessageKind::Chat), 1);
    assert!(log.turns().is_empty());

    let ends = connector.take();
    ends.emit(TransportEvent::Opened);
    ends.emit(frame(&Message::chat("Result: 250 sales last month")));
    settle().await;
    render_pending(&mut dom).await;

    let turns = log.turns();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].role, Role::Bot);
    assert_eq!(turns[0].text, "Result: 250 sales last month");
    assert_eq!(connector.open_count(), 1);

    drop(dom);
    assert_eq!(client.subscriber_count(MessageKind::Chat), 0);
}
