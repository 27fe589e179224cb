//! The client against a live agent endpoint over a real socket.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use terno_client::ws::transport::TungsteniteConnector;
use terno_client::{ChatClient, ClientConfig, ConnectionState, MessageKind};
use terno_server::{FrontendMode, ServerConfig};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

async fn start_agent() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = ServerConfig {
        bind_addr: addr,
        step_delay: Duration::from_millis(10),
        frontend: FrontendMode::Disabled,
    };
    tokio::spawn(async move {
        terno_server::serve(listener, &config).await.unwrap();
    });
    format!("ws://{addr}/ws/agent/")
}

#[tokio::test]
async fn asks_a_question_and_streams_the_answer() {
    let url = start_agent().await;
    let client = ChatClient::new(ClientConfig::new(url).unwrap(), Arc::new(TungsteniteConnector));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let chat_tx = tx.clone();
    client.subscribe(MessageKind::Chat, move |m| {
        let _ = chat_tx.send(m.text().to_string());
    });
    client.subscribe(MessageKind::Notification, move |m| {
        let _ = tx.send(format!("[{}]", m.text()));
    });

    let mut states = client.watch_state();
    client.connect();
    tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(state) = states.next().await {
            if state == ConnectionState::Open {
                break;
            }
        }
    })
    .await
    .expect("connection did not open");

    let greeting = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(greeting, "[Connected to LLM Agent WebSocket]");

    client.send_chat_message("How many sales last month?").unwrap();

    let mut answer = Vec::new();
    while answer.len() < 5 {
        let line = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("agent stopped answering")
            .unwrap();
        answer.push(line);
    }
    assert!(answer[0].starts_with("Thought:"));
    assert_eq!(answer[4], "Result: 250 sales last month");
    assert!(client.is_connected());
}
