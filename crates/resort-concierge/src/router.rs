//! Intent Router
//!
//! One classification call per turn. The raw label is matched by substring
//! with a fixed priority, so chatty answers like "Route to: 'Restaurant'"
//! still resolve.

use std::sync::Arc;

use agent_core::{GenerationOptions, LlmProvider, Result};

use crate::ROUTER_PROMPT;
use crate::agents::AgentIdentity;

/// Map a raw classifier label to an agent
///
/// Priority is Restaurant, then RoomService, then Receptionist. A label
/// naming several agents resolves to the first in that order.
pub fn parse_intent(label: &str) -> AgentIdentity {
    let label = label.trim();
    if label.contains(AgentIdentity::Restaurant.label()) {
        AgentIdentity::Restaurant
    } else if label.contains(AgentIdentity::RoomService.label()) {
        AgentIdentity::RoomService
    } else {
        AgentIdentity::Receptionist
    }
}

/// Classifies a guest message into an [`AgentIdentity`]
pub struct IntentRouter {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl IntentRouter {
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    /// Classify `text`; transport errors are returned unchanged
    pub async fn route(&self, text: &str) -> Result<AgentIdentity> {
        let label = self.provider.classify(ROUTER_PROMPT, text, &self.options).await?;
        tracing::debug!(label = %label.trim(), "Router label");

        let identity = parse_intent(&label);
        tracing::info!(agent = %identity, "Routed guest message");
        Ok(identity)
    }
}
