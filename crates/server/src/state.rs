//! Application state shared across request handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::agent::Agent;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<Agent>,
}

impl AppState {
    pub fn new(step_delay: Duration) -> Self {
        Self {
            agent: Arc::new(Agent::new(step_delay)),
        }
    }
}
