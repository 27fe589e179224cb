//! WASM/Web transport using web_sys::WebSocket.

use futures_util::StreamExt;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{js_sys, CloseEvent, Event, MessageEvent, WebSocket};

use super::{Connector, TransportCommand, TransportEnds, TransportEvent, TransportHandle};

/// Opens browser WebSockets inside a local task.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSysConnector;

impl Connector for WebSysConnector {
    fn open(&self, url: &str) -> TransportHandle {
        let (handle, ends) = TransportHandle::pair();
        spawn_local(run_socket(url.to_string(), ends));
        handle
    }
}

async fn run_socket(url: String, mut ends: TransportEnds) {
    let ws = match WebSocket::new(&url) {
        Ok(ws) => ws,
        Err(e) => {
            crate::log_error!("Failed to create WebSocket for {}: {:?}", url, e);
            ends.emit(TransportEvent::Error(format!("{e:?}")));
            ends.emit(TransportEvent::Closed { reason: None });
            return;
        }
    };

    let events = ends.events.clone();
    let onopen = Closure::wrap(Box::new(move |_: Event| {
        let _ = events.unbounded_send(TransportEvent::Opened);
    }) as Box<dyn FnMut(Event)>);
    ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));

    let events = ends.events.clone();
    let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
        if let Ok(text) = e.data().dyn_into::<js_sys::JsString>() {
            let _ = events.unbounded_send(TransportEvent::Frame(text.into()));
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));

    let events = ends.events.clone();
    let url_for_error = url.clone();
    let onerror = Closure::wrap(Box::new(move |_: Event| {
        // Browsers do not expose error details for WebSocket failures.
        let _ = events.unbounded_send(TransportEvent::Error(format!(
            "WebSocket error on {url_for_error}"
        )));
    }) as Box<dyn FnMut(Event)>);
    ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));

    let events = ends.events.clone();
    let onclose = Closure::wrap(Box::new(move |e: CloseEvent| {
        let reason = if e.reason().is_empty() {
            format!("code {}", e.code())
        } else {
            e.reason()
        };
        let _ = events.unbounded_send(TransportEvent::Closed {
            reason: Some(reason),
        });
    }) as Box<dyn FnMut(CloseEvent)>);
    ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

    // The callbacks live as long as this task; it ends when the client lets go.
    while let Some(command) = ends.commands.next().await {
        match command {
            TransportCommand::Send(text) => {
                if let Err(e) = ws.send_with_str(&text) {
                    crate::log_error!("Send failed: {:?}", e);
                }
            }
            TransportCommand::Close => break,
        }
    }

    ws.set_onopen(None);
    ws.set_onmessage(None);
    ws.set_onerror(None);
    ws.set_onclose(None);
    let _ = ws.close();
    drop((onopen, onmessage, onerror, onclose));
}
