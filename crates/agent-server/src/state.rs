//! Application State

use std::sync::Arc;

use agent_core::Agent;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Orchestrator bound to the provider selected at startup
    pub agent: Arc<Agent>,
}
