//! Terno Server - agent chat endpoint
//!
//! Serves the WebSocket the chat client talks to at `/ws/agent/`, plus an
//! optional static build of the web client.

use axum::{routing::get, Router};
use terno_shared::AGENT_WS_PATH;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod agent;
pub mod config;
mod frontend;
pub mod state;
mod ws;

pub use config::{FrontendMode, ServerConfig};
pub use state::AppState;

/// Build the application router.
pub fn app(state: AppState, frontend: &FrontendMode) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route(AGENT_WS_PATH, get(ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    frontend::mount_web_client(router, frontend)
}

/// Serve `config` on an already bound listener until the process ends.
pub async fn serve(listener: TcpListener, config: &ServerConfig) -> std::io::Result<()> {
    let state = AppState::new(config.step_delay);
    axum::serve(listener, app(state, &config.frontend)).await
}
