use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, Stream, StreamExt};
use terno_server::{FrontendMode, ServerConfig};
use terno_shared::{Message, NotificationStatus};
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = ServerConfig {
        bind_addr: addr,
        step_delay: Duration::from_millis(5),
        frontend: FrontendMode::Disabled,
    };
    tokio::spawn(async move {
        terno_server::serve(listener, &config).await.unwrap();
    });
    addr
}

async fn next_message<S>(read: &mut S) -> Message
where
    S: Stream<Item = Result<WsMessage, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), read.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("read error");
        if let WsMessage::Text(text) = frame {
            return Message::decode(text.as_str()).expect("server sent malformed frame");
        }
    }
}

#[tokio::test]
async fn greets_then_streams_agent_steps() {
    let addr = start_server().await;
    let (ws, _) = connect_async(format!("ws://{addr}/ws/agent/")).await.unwrap();
    let (mut write, mut read) = ws.split();

    let greeting = next_message(&mut read).await;
    assert_eq!(greeting.text(), "Connected to LLM Agent WebSocket");
    assert_eq!(greeting.status(), Some(NotificationStatus::Info));

    let question = Message::chat("How many sales last month?").encode().unwrap();
    write.send(WsMessage::Text(question.into())).await.unwrap();

    let mut steps = Vec::new();
    for _ in 0..5 {
        let step = next_message(&mut read).await;
        assert!(matches!(step, Message::Chat { .. }));
        steps.push(step.text().to_string());
    }
    assert_eq!(steps[0], "Thought: I need to fetch the schema...");
    assert_eq!(steps[4], "Result: 250 sales last month");
}

#[tokio::test]
async fn malformed_frame_gets_error_notification_and_session_survives() {
    let addr = start_server().await;
    let (ws, _) = connect_async(format!("ws://{addr}/ws/agent/")).await.unwrap();
    let (mut write, mut read) = ws.split();
    next_message(&mut read).await;

    write
        .send(WsMessage::Text(r#"{"message":"no type"}"#.into()))
        .await
        .unwrap();
    let reply = next_message(&mut read).await;
    assert!(reply.is_error());

    let question = Message::chat("still there?").encode().unwrap();
    write.send(WsMessage::Text(question.into())).await.unwrap();
    let step = next_message(&mut read).await;
    assert!(step.text().starts_with("Thought:"));
}

async fn get(addr: SocketAddr, path: &str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn serves_web_client_beside_agent_endpoint() {
    let dir = std::env::temp_dir().join(format!("terno-web-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<title>Terno</title>").unwrap();
    std::fs::write(dir.join("app.js"), "console.log('terno')").unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = ServerConfig {
        bind_addr: addr,
        step_delay: Duration::from_millis(5),
        frontend: FrontendMode::Static {
            dir: dir.to_string_lossy().into_owned(),
        },
    };
    tokio::spawn(async move {
        terno_server::serve(listener, &config).await.unwrap();
    });

    let asset = get(addr, "/app.js").await;
    assert!(asset.starts_with("HTTP/1.1 200"));
    assert!(asset.contains("console.log('terno')"));

    let deep_link = get(addr, "/chat/history").await;
    assert!(deep_link.starts_with("HTTP/1.1 200"));
    assert!(deep_link.contains("<title>Terno</title>"));

    let (ws, _) = connect_async(format!("ws://{addr}/ws/agent/")).await.unwrap();
    let (_write, mut read) = ws.split();
    let greeting = next_message(&mut read).await;
    assert_eq!(greeting.text(), "Connected to LLM Agent WebSocket");

    let _ = std::fs::remove_dir_all(&dir);
}
