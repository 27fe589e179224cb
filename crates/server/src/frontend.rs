//! Web build of the chat client, served next to the agent endpoint.

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::FrontendMode;

/// Hand every path not claimed by the agent routes to the web build.
///
/// Unknown paths get `index.html` so client-side routes survive a reload.
pub fn mount_web_client(router: Router, mode: &FrontendMode) -> Router {
    let FrontendMode::Static { dir } = mode else {
        tracing::info!("Web client not served; agent endpoint only");
        return router;
    };

    let root = Path::new(dir);
    let index = root.join("index.html");
    if !index.is_file() {
        tracing::warn!("No index.html in {}; unknown paths will 404", root.display());
    }
    tracing::info!("Serving web client from {}", root.display());

    router.fallback_service(ServeDir::new(root).fallback(ServeFile::new(index)))
}
