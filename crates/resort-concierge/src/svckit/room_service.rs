//! Room Service Tool

use std::sync::Arc;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolOutput, ToolSchema, tool::ParameterSchema};
use async_trait::async_trait;

use super::{required_arg, text_arg};
use crate::store::ResortStore;

/// Tool for housekeeping requests: cleaning, laundry, amenities
pub struct RoomServiceTool {
    store: Arc<dyn ResortStore>,
}

impl RoomServiceTool {
    pub fn new(store: Arc<dyn ResortStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for RoomServiceTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_room_service_request".into(),
            description: "Create a room service request for cleaning, laundry or amenities (towels, soap, etc.).".into(),
            parameters: vec![
                ParameterSchema::required("room_number", "string", "Guest room number"),
                ParameterSchema::required(
                    "request_type",
                    "string",
                    "Kind of request (e.g., 'cleaning', 'laundry', 'towels')",
                ),
                ParameterSchema::optional("details", "string", "Anything housekeeping should know"),
            ],
            has_side_effects: true,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolOutput> {
        let room_number = required_arg(call, "room_number")?;
        let request_type = required_arg(call, "request_type")?;
        let details = text_arg(call, "details");

        let request = self
            .store
            .create_service_request(&room_number, &request_type, details)
            .await?;

        let mut output = format!(
            "Service request #{} created for room {}: {}",
            request.id, request.room_number, request.request_type
        );
        if let Some(details) = &request.details {
            output.push_str(&format!(" ({details})"));
        }
        output.push_str(&format!(". Status: {}", request.status));

        Ok(ToolOutput::text(output))
    }
}
