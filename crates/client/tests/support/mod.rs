//! In-memory transport for driving a [`ChatClient`] from tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use terno_client::ws::{Connector, TransportEnds, TransportEvent, TransportHandle};
use terno_client::{ChatClient, ClientConfig, Message, ReconnectConfig};

pub const URL: &str = "ws://agent.test/ws/agent/";

/// Records every transport the client opens and hands the socket side to the test.
#[derive(Clone, Default)]
pub struct MockConnector {
    opened: Arc<Mutex<Vec<(String, TransportEnds)>>>,
    urls: Arc<Mutex<Vec<String>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_count(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    /// Take the socket side of the oldest transport not yet taken.
    pub fn take(&self) -> TransportEnds {
        let mut opened = self.opened.lock().unwrap();
        assert!(!opened.is_empty(), "no transport was opened");
        opened.remove(0).1
    }
}

impl Connector for MockConnector {
    fn open(&self, url: &str) -> TransportHandle {
        let (handle, ends) = TransportHandle::pair();
        self.urls.lock().unwrap().push(url.to_string());
        self.opened.lock().unwrap().push((url.to_string(), ends));
        handle
    }
}

pub fn client_with(reconnect: ReconnectConfig) -> (ChatClient, MockConnector) {
    let connector = MockConnector::new();
    let config = ClientConfig::new(URL).unwrap().with_reconnect(reconnect);
    let client = ChatClient::new(config, Arc::new(connector.clone()));
    (client, connector)
}

pub fn client() -> (ChatClient, MockConnector) {
    client_with(ReconnectConfig::fixed(Duration::from_secs(5)))
}

/// Let spawned pump and timer tasks run until they block.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

pub fn frame(message: &Message) -> TransportEvent {
    TransportEvent::Frame(message.encode().unwrap())
}

/// Thread-safe sink for what handlers observed.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}
