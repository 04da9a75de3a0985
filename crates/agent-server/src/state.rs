//! Application State

use std::sync::Arc;

use resort_concierge::{AgentManager, ResortStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Routes and resolves chat turns; owns the LLM provider
    pub manager: Arc<AgentManager>,

    /// Orders and service requests for the operations endpoints
    pub store: Arc<dyn ResortStore>,
}

impl AppState {
    pub fn new(manager: AgentManager, store: Arc<dyn ResortStore>) -> Self {
        Self {
            manager: Arc::new(manager),
            store,
        }
    }
}
