//! WebSocket handler for the agent chat endpoint.

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use terno_shared::{Message, NotificationStatus};

use crate::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

type Sender = SplitSink<WebSocket, WsMessage>;

async fn send(sender: &mut Sender, message: &Message) -> bool {
    let frame = match message.encode() {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!("Failed to encode {} message: {}", message.kind(), e);
            return true;
        }
    };
    sender.send(WsMessage::Text(frame.into())).await.is_ok()
}

/// Serve one chat session. Questions are answered one at a time, in arrival order.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let agent = state.agent.clone();

    tracing::info!("Agent WebSocket connected");
    if !send(&mut sender, &agent.greeting()).await {
        return;
    }

    while let Some(msg) = receiver.next().await {
        let text = match msg {
            Ok(WsMessage::Text(text)) => text,
            Ok(WsMessage::Close(_)) => break,
            Err(e) => {
                tracing::debug!("Agent WebSocket read error: {}", e);
                break;
            }
            _ => continue,
        };

        let question = match Message::decode(text.as_str()) {
            Ok(Message::Chat { text, .. }) => text,
            Ok(other) => {
                tracing::debug!("Ignoring {} message from client", other.kind());
                continue;
            }
            Err(e) => {
                tracing::warn!("Rejecting malformed frame: {}", e);
                let reply = Message::notification(
                    NotificationStatus::Error,
                    format!("Malformed message: {e}"),
                );
                if !send(&mut sender, &reply).await {
                    break;
                }
                continue;
            }
        };

        for step in agent.steps(&question) {
            tokio::time::sleep(agent.step_delay()).await;
            if !send(&mut sender, &step).await {
                tracing::info!("Agent WebSocket disconnected mid-answer");
                return;
            }
        }
    }

    tracing::info!("Agent WebSocket disconnected");
}
