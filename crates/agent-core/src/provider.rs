//! LLM Provider Strategy Pattern
//!
//! Defines the model transport boundary. A provider turns a [`ModelContext`]
//! into a [`ModelReply`] made of typed response parts; agents never see the
//! wire format.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::provider::{LlmProvider, ModelContext, GenerationOptions};
//!
//! let mut context = ModelContext::new(prompt, registry.schemas(), GenerationOptions::default());
//! let reply = provider.converse(&mut context, "Show me the menu").await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::tool::ToolSchema;

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gemini-2.0-flash-exp", "llama3.2")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Top-p nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

const fn default_temperature() -> f32 { 0.7 }
const fn default_max_tokens() -> u32 { 2048 }
const fn default_top_p() -> f32 { 0.9 }

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash-exp".into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
        }
    }
}

impl GenerationOptions {
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}

/// One element of a model reply
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePart {
    /// Natural-language text
    Text { text: String },

    /// Request to invoke a named tool
    FunctionCall { name: String, args: Value },

    /// Anything the agent cannot act on (inline data, code execution, ...)
    Unsupported { kind: String },
}

impl ResponsePart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn function_call(name: impl Into<String>, args: Value) -> Self {
        Self::FunctionCall {
            name: name.into(),
            args,
        }
    }
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolUse,
    ContentFilter,
    Other(String),
}

/// Per-category safety assessment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyRating {
    pub category: String,
    pub probability: String,
}

/// Content-safety feedback attached to a reply
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptFeedback {
    /// Why the prompt or reply was blocked, if it was
    pub block_reason: Option<String>,

    #[serde(default)]
    pub safety_ratings: Vec<SafetyRating>,
}

impl PromptFeedback {
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            block_reason: Some(reason.into()),
            safety_ratings: Vec::new(),
        }
    }
}

impl std::fmt::Display for PromptFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields = Vec::new();
        if let Some(reason) = &self.block_reason {
            fields.push(format!("block_reason: {reason}"));
        }
        if !self.safety_ratings.is_empty() {
            let ratings: Vec<String> = self
                .safety_ratings
                .iter()
                .map(|r| format!("{}: {}", r.category, r.probability))
                .collect();
            fields.push(format!("safety_ratings: [{}]", ratings.join(", ")));
        }
        if fields.is_empty() {
            write!(f, "no details")
        } else {
            write!(f, "{}", fields.join(", "))
        }
    }
}

/// A structured model reply
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelReply {
    /// Ordered response parts
    pub parts: Vec<ResponsePart>,

    /// Content-safety signal, when the provider sent one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

impl ModelReply {
    pub const fn from_parts(parts: Vec<ResponsePart>) -> Self {
        Self {
            parts,
            prompt_feedback: None,
            finish_reason: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::from_parts(vec![ResponsePart::text(text)])
    }

    pub fn function_call(name: impl Into<String>, args: Value) -> Self {
        Self::from_parts(vec![ResponsePart::function_call(name, args)])
    }

    /// A reply without any parts
    pub const fn empty() -> Self {
        Self::from_parts(Vec::new())
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: PromptFeedback) -> Self {
        self.prompt_feedback = Some(feedback);
        self
    }

    /// Concatenated text parts; `None` when there is no non-empty text
    pub fn text_content(&self) -> Option<String> {
        let text: String = self
            .parts
            .iter()
            .filter_map(|part| match part {
                ResponsePart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        if text.trim().is_empty() { None } else { Some(text) }
    }
}

/// One entry of a model conversation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContextEntry {
    /// Message sent on behalf of the guest
    User { text: String },

    /// Parts the model produced
    Model { parts: Vec<ResponsePart> },

    /// Result of a tool call fed back to the model
    FunctionResponse { name: String, response: Value },
}

/// Conversational state for one agent session
///
/// Tool declarations and the system prompt are bound at construction;
/// entries only grow while a turn is being resolved.
#[derive(Clone, Debug)]
pub struct ModelContext {
    system_prompt: String,
    tools: Vec<ToolSchema>,
    options: GenerationOptions,
    entries: Vec<ContextEntry>,
}

impl ModelContext {
    pub fn new(
        system_prompt: impl Into<String>,
        tools: Vec<ToolSchema>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            tools,
            options,
            entries: Vec::new(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn tools(&self) -> &[ToolSchema] {
        &self.tools
    }

    pub const fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    pub fn push(&mut self, entry: ContextEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Provider metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "Gemini", "Ollama")
    pub name: String,

    /// Default model
    pub model: String,

    /// Whether native function calling is supported
    pub supports_tools: bool,
}

/// Strategy trait for model transports
///
/// Implementors provide `generate`; the conversational helpers keep the
/// context in sync with what was sent and received.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get provider information and capabilities
    async fn info(&self) -> Result<ProviderInfo>;

    /// Check if the provider is reachable and configured
    async fn health_check(&self) -> Result<bool>;

    /// Produce a reply for the full context, without mutating it
    async fn generate(&self, context: &ModelContext) -> Result<ModelReply>;

    /// Single-shot classification: one prompt, one text, raw label back
    async fn classify(
        &self,
        system_prompt: &str,
        text: &str,
        options: &GenerationOptions,
    ) -> Result<String> {
        let mut context = ModelContext::new(system_prompt, Vec::new(), options.clone());
        context.push(ContextEntry::User { text: text.to_string() });

        let reply = self.generate(&context).await?;
        Ok(reply.text_content().unwrap_or_default())
    }

    /// Send a user message and record the reply in the context
    async fn converse(&self, context: &mut ModelContext, message: &str) -> Result<ModelReply> {
        context.push(ContextEntry::User {
            text: message.to_string(),
        });

        let reply = self.generate(context).await?;
        context.push(ContextEntry::Model {
            parts: reply.parts.clone(),
        });
        Ok(reply)
    }

    /// Feed a tool result back and record the follow-up reply
    async fn converse_with_tool_result(
        &self,
        context: &mut ModelContext,
        name: &str,
        result: &Value,
    ) -> Result<ModelReply> {
        context.push(ContextEntry::FunctionResponse {
            name: name.to_string(),
            response: serde_json::json!({ "result": result }),
        });

        let reply = self.generate(context).await?;
        context.push(ContextEntry::Model {
            parts: reply.parts.clone(),
        });
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert!((opts.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(opts.max_tokens, 2048);
        assert_eq!(opts.model, "gemini-2.0-flash-exp");
    }

    #[test]
    fn test_text_content_ignores_function_calls() {
        let reply = ModelReply::from_parts(vec![
            ResponsePart::text("Here is "),
            ResponsePart::function_call("get_menu_items", json!({})),
            ResponsePart::text("the menu"),
        ]);
        assert_eq!(reply.text_content().as_deref(), Some("Here is the menu"));
        assert_eq!(ModelReply::function_call("x", json!({})).text_content(), None);
        assert_eq!(ModelReply::text("  ").text_content(), None);
    }

    #[test]
    fn test_feedback_display() {
        let feedback = PromptFeedback {
            block_reason: Some("SAFETY".into()),
            safety_ratings: vec![SafetyRating {
                category: "HARM_CATEGORY_HARASSMENT".into(),
                probability: "HIGH".into(),
            }],
        };
        assert_eq!(
            feedback.to_string(),
            "block_reason: SAFETY, safety_ratings: [HARM_CATEGORY_HARASSMENT: HIGH]"
        );
        assert_eq!(PromptFeedback::default().to_string(), "no details");
    }
}
