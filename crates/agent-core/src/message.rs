//! Conversation Turns
//!
//! The chat history as it arrives from a client. The system is stateless per
//! request: only the latest user turn is ever forwarded to a model.

use serde::{Deserialize, Serialize};

/// Role of a conversation participant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Guest input
    User,
    /// Agent reply
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single entry of a chat history
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who wrote the entry
    pub role: Role,

    /// Text content
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Content of the most recent user turn, scanning from the end
///
/// A blank latest user turn counts as no message; older turns are not
/// consulted.
pub fn last_user_message(history: &[ConversationTurn]) -> Option<&str> {
    history
        .iter()
        .rev()
        .find(|turn| turn.role == Role::User)
        .map(|turn| turn.content.as_str())
        .filter(|content| !content.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_user_message_skips_assistant_turns() {
        let history = vec![
            ConversationTurn::user("first"),
            ConversationTurn::assistant("reply"),
            ConversationTurn::user("second"),
            ConversationTurn::assistant("another reply"),
        ];
        assert_eq!(last_user_message(&history), Some("second"));
    }

    #[test]
    fn test_last_user_message_none() {
        let history = vec![ConversationTurn::assistant("Welcome!")];
        assert_eq!(last_user_message(&history), None);
        assert_eq!(last_user_message(&[]), None);
    }

    #[test]
    fn test_blank_latest_user_turn_is_no_message() {
        let history = vec![ConversationTurn::user("earlier"), ConversationTurn::user("  ")];
        assert_eq!(last_user_message(&history), None);
    }

    #[test]
    fn test_role_wire_format() {
        let turn: ConversationTurn =
            serde_json::from_str(r#"{"role": "user", "content": "Hi"}"#).unwrap();
        assert_eq!(turn.role, Role::User);
        assert_eq!(serde_json::to_value(Role::Assistant).unwrap(), "assistant");
    }
}
