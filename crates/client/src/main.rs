//! Terno Chat - terminal front end for the agent chat endpoint.
//!
//! Reads questions from stdin, prints agent replies as they stream in.
//! `/quit` or end of input exits.

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use terno_client::{ChatClient, ClientConfig, Conversation, MessageKind};
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("terno_client=info")),
        )
        .init();

    let config = ClientConfig::from_env()?;
    let client = ChatClient::from_config(config);

    client.subscribe(MessageKind::Chat, |message| println!("agent> {}", message.text()));
    client.subscribe(MessageKind::Notification, |message| {
        if message.is_error() {
            eprintln!("[connection problem] {}", message.text());
        } else {
            eprintln!("[{}]", message.text());
        }
    });
    client.connect();

    let mut conversation = Conversation::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }
        if let Err(e) = conversation.send(&client, &line) {
            eprintln!("{e}");
        }
    }

    tracing::info!("Sent {} messages", conversation.len());
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
