//! Root component that owns the chat connection.

use dioxus::prelude::*;

use super::client::ChatClient;

/// Provide `client` to every descendant and open the connection once on mount.
///
/// ```rust,ignore
/// rsx! {
///     ChatProvider { client: ChatClient::from_config(config),
///         ChatPage {}
///     }
/// }
/// ```
#[component]
pub fn ChatProvider(client: ChatClient, children: Element) -> Element {
    let client = use_context_provider(|| client);
    use_hook(move || {
        crate::log_info!("ChatProvider: connecting to {}", client.url());
        client.connect();
    });

    children
}
