//! Native/Desktop transport using tokio-tungstenite.

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use super::{Connector, TransportCommand, TransportEnds, TransportEvent, TransportHandle};

/// Opens WebSocket transports on the ambient tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

impl Connector for TungsteniteConnector {
    fn open(&self, url: &str) -> TransportHandle {
        let (handle, ends) = TransportHandle::pair();
        tokio::spawn(run_socket(url.to_string(), ends));
        handle
    }
}

async fn run_socket(url: String, ends: TransportEnds) {
    let TransportEnds {
        mut commands,
        events,
    } = ends;
    let emit = |event: TransportEvent| {
        let _ = events.unbounded_send(event);
    };

    let ws_stream = match connect_async(url.as_str()).await {
        Ok((ws_stream, _response)) => ws_stream,
        Err(e) => {
            crate::log_error!("WebSocket connect to {} failed: {}", url, e);
            emit(TransportEvent::Error(e.to_string()));
            emit(TransportEvent::Closed { reason: None });
            return;
        }
    };

    crate::log_debug!("WebSocket to {} established", url);
    emit(TransportEvent::Opened);

    let (mut write, mut read) = ws_stream.split();
    let mut reason = None;

    loop {
        tokio::select! {
            command = commands.next() => match command {
                Some(TransportCommand::Send(text)) => {
                    crate::log_debug!("Sending to {}: {}", url, text);
                    if let Err(e) = write.send(WsMessage::Text(text.into())).await {
                        crate::log_error!("Send failed: {}", e);
                        emit(TransportEvent::Error(e.to_string()));
                        break;
                    }
                }
                Some(TransportCommand::Close) | None => {
                    // The client discarded this transport; nobody listens for its events any more.
                    let _ = write.send(WsMessage::Close(None)).await;
                    return;
                }
            },
            frame = read.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => emit(TransportEvent::Frame(text.as_str().to_owned())),
                Some(Ok(WsMessage::Close(frame))) => {
                    reason = frame
                        .map(|f| f.reason.as_str().to_owned())
                        .filter(|r| !r.is_empty());
                    crate::log_info!("WebSocket to {} received close frame", url);
                    break;
                }
                Some(Ok(_)) => {
                    // Ping/pong are answered by tungstenite; binary frames are not part of the protocol.
                }
                Some(Err(e)) => {
                    crate::log_error!("WebSocket read error: {}", e);
                    emit(TransportEvent::Error(e.to_string()));
                    break;
                }
                None => break,
            },
        }
    }

    emit(TransportEvent::Closed { reason });
}
