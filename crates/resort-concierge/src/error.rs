//! Error Types for the Resort Concierge

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConciergeError>;

#[derive(Error, Debug)]
pub enum ConciergeError {
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("Not on the menu: {}", .0.join(", "))]
    UnknownMenuItems(Vec<String>),

    #[error("Order {0} not found")]
    OrderNotFound(u64),

    #[error("Service request {0} not found")]
    RequestNotFound(u64),

    #[error("Store error: {0}")]
    Store(String),
}

impl ConciergeError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::OrderNotFound(_) | Self::RequestNotFound(_))
    }
}

impl From<ConciergeError> for AgentError {
    fn from(err: ConciergeError) -> Self {
        match err {
            ConciergeError::MissingArgument(_) | ConciergeError::InvalidArgument { .. } => {
                Self::ToolValidation(err.to_string())
            }
            other => Self::ToolExecution(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_boundary_conversion() {
        let err: AgentError = ConciergeError::MissingArgument("room_number").into();
        assert!(matches!(err, AgentError::ToolValidation(ref m) if m == "Missing argument: room_number"));

        let err: AgentError =
            ConciergeError::UnknownMenuItems(vec!["Sushi".into(), "Ramen".into()]).into();
        assert!(matches!(err, AgentError::ToolExecution(ref m) if m == "Not on the menu: Sushi, Ramen"));
    }
}
