//! Turn Resolution
//!
//! An [`AgentSession`] binds a system prompt, a tool registry and a fresh
//! model context, then resolves exactly one user turn:
//!
//! 1. take the last user message from the history,
//! 2. send it to the model,
//! 3. act on the first decisive response part (text, or one tool call plus a
//!    single follow-up round-trip).
//!
//! Tool faults and malformed replies end up as reply text. Only transport
//! errors are returned as `Err`.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::error::{AgentError, Result};
use crate::message::{ConversationTurn, last_user_message};
use crate::provider::{GenerationOptions, LlmProvider, ModelContext, ModelReply, ResponsePart};
use crate::session::{SessionId, TurnOutcome, TurnPhase};
use crate::tool::{self, ToolCall, ToolRegistry};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Agent name, used in logs
    pub name: String,

    /// System prompt bound to the model context
    pub system_prompt: String,

    /// Generation options
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "assistant".into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            generation: GenerationOptions::default(),
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. Use the available tools \
                                     when they help answer the request. Be concise and accurate.";

/// A single-turn agent session
///
/// Consumed by [`AgentSession::resolve_turn`]; build a new one per request.
pub struct AgentSession {
    id: SessionId,
    name: String,
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    context: ModelContext,
    phase: TurnPhase,
}

impl AgentSession {
    /// Create a new session
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        let context = ModelContext::new(config.system_prompt, tools.schemas(), config.generation);

        Self {
            id: SessionId::new(),
            name: config.name,
            provider,
            tools,
            context,
            phase: TurnPhase::Start,
        }
    }

    pub const fn id(&self) -> &SessionId {
        &self.id
    }

    /// Tool registry bound to this session
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Resolve one turn into the reply text
    pub async fn resolve_turn(self, history: &[ConversationTurn]) -> Result<String> {
        self.resolve(history).await.map(TurnOutcome::into_reply)
    }

    /// Resolve one turn, keeping the structured outcome
    pub async fn resolve(mut self, history: &[ConversationTurn]) -> Result<TurnOutcome> {
        let started = Utc::now();

        let Some(message) = last_user_message(history) else {
            tracing::debug!(session = %self.id, agent = %self.name, "No user turn in history");
            self.advance(TurnPhase::Done);
            return Ok(TurnOutcome::Clarify);
        };

        self.advance(TurnPhase::AwaitingModelReply);
        let reply = self.provider.converse(&mut self.context, message).await?;
        let outcome = self.dispatch(reply).await?;
        self.advance(TurnPhase::Done);

        let elapsed_ms = (Utc::now() - started).num_milliseconds();
        if outcome.is_diagnostic() {
            tracing::warn!(
                session = %self.id,
                agent = %self.name,
                outcome = outcome.label(),
                elapsed_ms,
                "Turn resolved with a diagnostic reply"
            );
        } else {
            tracing::info!(
                session = %self.id,
                agent = %self.name,
                outcome = outcome.label(),
                elapsed_ms,
                "Turn resolved"
            );
        }

        Ok(outcome)
    }

    /// Act on the first decisive part of the reply
    async fn dispatch(&mut self, reply: ModelReply) -> Result<TurnOutcome> {
        if reply.parts.is_empty() {
            self.advance(TurnPhase::ReturnText);
            return Ok(match reply.prompt_feedback {
                Some(feedback) => {
                    tracing::warn!(session = %self.id, %feedback, "Reply had no parts");
                    TurnOutcome::Blocked(feedback)
                }
                None => TurnOutcome::NoContent,
            });
        }

        for part in reply.parts {
            match part {
                ResponsePart::FunctionCall { name, args } => {
                    return self.call_tool(name, &args).await;
                }
                ResponsePart::Text { text } => {
                    self.advance(TurnPhase::ReturnText);
                    return Ok(TurnOutcome::Text(text));
                }
                ResponsePart::Unsupported { kind } => {
                    tracing::debug!(session = %self.id, %kind, "Skipping unsupported part");
                }
            }
        }

        self.advance(TurnPhase::ReturnText);
        Ok(TurnOutcome::Unstructured)
    }

    /// Run one tool call and, if it produced something, one follow-up
    async fn call_tool(&mut self, name: String, args: &Value) -> Result<TurnOutcome> {
        let Some(tool) = self.tools.get(&name) else {
            tracing::warn!(session = %self.id, function = %name, "Model called an unknown function");
            self.advance(TurnPhase::ReturnText);
            return Ok(TurnOutcome::UnknownFunction { name });
        };

        self.advance(TurnPhase::InvokeTool);
        let call = ToolCall::from_json(name.as_str(), args);
        tracing::debug!(session = %self.id, function = %name, args = %args, "Executing tool");

        let output = match tool::invoke(tool.as_ref(), &call).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(session = %self.id, function = %name, error = %e, "Tool call failed");
                self.advance(TurnPhase::ReturnText);
                return Ok(TurnOutcome::ToolFailed {
                    name,
                    reason: tool_failure_reason(&e),
                });
            }
        };

        if output.is_empty() {
            self.advance(TurnPhase::ReturnText);
            return Ok(TurnOutcome::ToolEmpty { name });
        }

        self.advance(TurnPhase::AwaitingFollowUp);
        let result = output.as_value().cloned().unwrap_or(Value::Null);
        let follow_up = self
            .provider
            .converse_with_tool_result(&mut self.context, &name, &result)
            .await?;

        self.advance(TurnPhase::ReturnFollowUpText);
        Ok(match follow_up.text_content() {
            Some(text) => TurnOutcome::FollowUp(text),
            None => TurnOutcome::RawToolResult(output.render()),
        })
    }

    fn advance(&mut self, next: TurnPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal turn transition {:?} -> {next:?}",
            self.phase
        );
        tracing::debug!(session = %self.id, from = ?self.phase, to = ?next, "Turn phase");
        self.phase = next;
    }
}

fn tool_failure_reason(err: &AgentError) -> String {
    match err {
        AgentError::ToolValidation(msg) | AgentError::ToolExecution(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// Builder for agent sessions
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: Arc::new(ToolRegistry::new()),
            config: AgentConfig::default(),
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn generation(mut self, options: GenerationOptions) -> Self {
        self.config.generation = options;
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    #[must_use]
    pub const fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub fn build(self) -> Result<AgentSession> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(AgentSession::new(provider, self.tools, self.config))
    }
}
