//! # agent-core
//!
//! Core agent logic: provider-agnostic model transport, tool registry and
//! single-turn resolution.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     AgentSession (one turn)                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │    Turn     │  │    Tools    │  │   LlmProvider       │  │
//! │  │ Resolution  │──│   Registry  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between Gemini, Ollama or any
//! other backend without changing agent logic.

pub mod error;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod session;
pub mod tool;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{AgentError, Result};
pub use message::{ConversationTurn, Role, last_user_message};
pub use provider::{
    GenerationOptions, LlmProvider, ModelContext, ModelReply, PromptFeedback, ResponsePart,
};
pub use reasoning::{AgentBuilder, AgentConfig, AgentSession};
pub use session::{SessionId, TurnOutcome};
pub use tool::{FnTool, Tool, ToolCall, ToolOutput, ToolRegistry, ToolSchema};
