//! Agent Manager
//!
//! Entry point for a guest turn: route the latest user message, build a
//! fresh session for the chosen agent and resolve the turn.
//!
//! ```text
//! history ──► last user text ──► IntentRouter ──► AgentIdentity
//!                                                     │
//!                 reply ◄── AgentSession::resolve_turn ◄┘
//! ```

use std::sync::Arc;

use agent_core::{
    AgentBuilder, AgentSession, ConversationTurn, GenerationOptions, LlmProvider, Result,
    last_user_message,
};

use crate::agents::{AgentCatalog, AgentIdentity};
use crate::router::IntentRouter;

/// What to do when the classification call fails
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RouterFailurePolicy {
    /// Return the transport error to the caller
    #[default]
    Propagate,
    /// Log it and let the Receptionist handle the turn
    FallbackToReceptionist,
}

#[derive(Clone, Debug, Default)]
pub struct ManagerConfig {
    /// Options for both the router and the agents
    pub generation: GenerationOptions,

    pub router_failure: RouterFailurePolicy,
}

/// Routes and resolves guest turns
///
/// Constructed once at startup; holds no per-conversation state.
pub struct AgentManager {
    provider: Arc<dyn LlmProvider>,
    router: IntentRouter,
    catalog: AgentCatalog,
    config: ManagerConfig,
}

impl AgentManager {
    pub fn new(provider: Arc<dyn LlmProvider>, catalog: AgentCatalog, config: ManagerConfig) -> Self {
        let router = IntentRouter::new(provider.clone(), config.generation.clone());
        Self {
            provider,
            router,
            catalog,
            config,
        }
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Pick the agent for a history
    ///
    /// Without a user message (no user turn, or a blank latest one) there is
    /// nothing to classify and the Receptionist answers.
    pub async fn select_agent(&self, history: &[ConversationTurn]) -> Result<AgentIdentity> {
        let Some(text) = last_user_message(history) else {
            tracing::debug!("No user turn, skipping classification");
            return Ok(AgentIdentity::Receptionist);
        };

        match self.router.route(text).await {
            Ok(identity) => Ok(identity),
            Err(e) if self.config.router_failure == RouterFailurePolicy::FallbackToReceptionist => {
                tracing::warn!(error = %e, "Routing failed, falling back to Receptionist");
                Ok(AgentIdentity::Receptionist)
            }
            Err(e) => Err(e),
        }
    }

    /// A fresh single-turn session for an agent
    pub fn session(&self, identity: AgentIdentity) -> Result<AgentSession> {
        AgentBuilder::new()
            .provider(self.provider.clone())
            .tools(self.catalog.tools(identity))
            .name(identity.label())
            .system_prompt(identity.system_prompt())
            .generation(self.config.generation.clone())
            .build()
    }

    /// Resolve one guest turn into the reply text
    pub async fn chat(&self, history: &[ConversationTurn]) -> Result<String> {
        let identity = self.select_agent(history).await?;
        let session = self.session(identity)?;
        tracing::debug!(session = %session.id(), agent = %identity, "Delegating turn");

        session.resolve_turn(history).await
    }
}
