//! Session Bookkeeping
//!
//! Identifiers, turn phases and turn outcomes for ephemeral agent sessions.
//! A session lives for exactly one turn; nothing here is persisted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::provider::PromptFeedback;

/// Reply used when the history holds no user turn
pub const CLARIFY_PROMPT: &str = "How can I help you?";

const UNSTRUCTURED_REPLY: &str = "I apologize, but I couldn't generate a response.";
const NO_CONTENT_REPLY: &str = "I apologize, but I couldn't generate a response at this time. \
                                Please try rephrasing your request.";

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a turn currently stands
///
/// ```text
/// Start -> AwaitingModelReply -> ReturnText -> Done
///                             -> InvokeTool -> AwaitingFollowUp -> ReturnFollowUpText -> Done
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    Start,
    AwaitingModelReply,
    ReturnText,
    InvokeTool,
    AwaitingFollowUp,
    ReturnFollowUpText,
    Done,
}

impl TurnPhase {
    /// Whether `next` is a legal successor
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Start, Self::AwaitingModelReply | Self::Done)
                | (Self::AwaitingModelReply, Self::ReturnText | Self::InvokeTool)
                | (Self::InvokeTool, Self::AwaitingFollowUp | Self::ReturnText)
                | (Self::AwaitingFollowUp, Self::ReturnFollowUpText)
                | (Self::ReturnText | Self::ReturnFollowUpText, Self::Done)
        )
    }
}

/// How a turn ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// No user turn; answered without calling the model
    Clarify,

    /// First decisive part was text
    Text(String),

    /// Tool ran and the model summarised its result
    FollowUp(String),

    /// Tool ran but the follow-up had no text
    RawToolResult(String),

    /// Tool ran and produced nothing
    ToolEmpty { name: String },

    /// Tool returned an error or panicked
    ToolFailed { name: String, reason: String },

    /// Model asked for a tool this agent does not have
    UnknownFunction { name: String },

    /// Parts were present but none was text or a function call
    Unstructured,

    /// No parts and a content-safety signal
    Blocked(PromptFeedback),

    /// No parts and no explanation
    NoContent,
}

impl TurnOutcome {
    /// Short label for logs
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Clarify => "clarify",
            Self::Text(_) => "text",
            Self::FollowUp(_) => "follow_up",
            Self::RawToolResult(_) => "raw_tool_result",
            Self::ToolEmpty { .. } => "tool_empty",
            Self::ToolFailed { .. } => "tool_failed",
            Self::UnknownFunction { .. } => "unknown_function",
            Self::Unstructured => "unstructured",
            Self::Blocked(_) => "blocked",
            Self::NoContent => "no_content",
        }
    }

    /// Whether the reply reports a problem rather than an answer
    pub const fn is_diagnostic(&self) -> bool {
        !matches!(
            self,
            Self::Clarify | Self::Text(_) | Self::FollowUp(_) | Self::RawToolResult(_)
        )
    }

    /// Text shown to the guest
    pub fn into_reply(self) -> String {
        match self {
            Self::Clarify => CLARIFY_PROMPT.into(),
            Self::Text(text) | Self::FollowUp(text) | Self::RawToolResult(text) => text,
            Self::ToolEmpty { name } => {
                format!("Error: Function {name} failed to return a result.")
            }
            Self::ToolFailed { name, reason } => {
                format!("Error: Function {name} failed: {reason}")
            }
            Self::UnknownFunction { name } => format!("Error: Function {name} not found."),
            Self::Unstructured => UNSTRUCTURED_REPLY.into(),
            Self::Blocked(feedback) => format!(
                "{UNSTRUCTURED_REPLY} The content may have been blocked. Feedback: {feedback}"
            ),
            Self::NoContent => NO_CONTENT_REPLY.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn test_phase_transitions() {
        assert!(TurnPhase::Start.can_advance_to(TurnPhase::AwaitingModelReply));
        assert!(TurnPhase::InvokeTool.can_advance_to(TurnPhase::AwaitingFollowUp));
        assert!(!TurnPhase::Start.can_advance_to(TurnPhase::InvokeTool));
        assert!(!TurnPhase::Done.can_advance_to(TurnPhase::Start));
    }

    #[test]
    fn test_diagnostics_are_distinct() {
        let empty = TurnOutcome::ToolEmpty { name: "get_menu_items".into() }.into_reply();
        let missing = TurnOutcome::UnknownFunction { name: "get_menu_items".into() }.into_reply();

        assert!(empty.contains("get_menu_items"));
        assert!(missing.contains("get_menu_items"));
        assert_ne!(empty, missing);
        assert!(missing.contains("not found"));
    }

    #[test]
    fn test_blocked_reply_carries_feedback() {
        let reply = TurnOutcome::Blocked(PromptFeedback::blocked("SAFETY")).into_reply();
        assert!(reply.contains("block_reason: SAFETY"));
        assert!(TurnOutcome::NoContent.into_reply().contains("rephrasing"));
    }
}
