//! Room Availability Tool
//!
//! Lists rooms that can be booked tonight, optionally for one room type.

use std::fmt::Write as _;
use std::sync::Arc;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolOutput, ToolSchema, tool::ParameterSchema};
use async_trait::async_trait;
use serde_json::json;

use super::text_arg;
use crate::model::{Room, format_price};
use crate::store::ResortStore;

/// Room types offered to the model
const ROOM_TYPES: [&str; 3] = ["Standard", "Deluxe", "Suite"];

/// Tool for checking which rooms are free
pub struct RoomAvailabilityTool {
    store: Arc<dyn ResortStore>,
}

impl RoomAvailabilityTool {
    pub fn new(store: Arc<dyn ResortStore>) -> Self {
        Self { store }
    }
}

fn room_types(rooms: &[Room]) -> Vec<&str> {
    let mut types: Vec<&str> = Vec::new();
    for room in rooms {
        if !types.contains(&room.room_type.as_str()) {
            types.push(&room.room_type);
        }
    }
    types
}

#[async_trait]
impl Tool for RoomAvailabilityTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "check_room_availability".into(),
            description: "Check which rooms are currently available, with nightly rates. Optionally filter by room type.".into(),
            parameters: vec![
                ParameterSchema::optional(
                    "room_type",
                    "string",
                    "Room type to check (e.g., 'Standard', 'Deluxe', 'Suite')",
                )
                .with_enum(ROOM_TYPES.iter().map(|t| json!(t)).collect()),
            ],
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolOutput> {
        let rooms = self.store.rooms().await?;
        let requested = text_arg(call, "room_type");

        let wanted = match &requested {
            Some(kind) => {
                let types = room_types(&rooms);
                let Some(found) = types.iter().find(|t| t.eq_ignore_ascii_case(kind)) else {
                    return Ok(ToolOutput::text(format!(
                        "We don't have '{kind}' rooms. Our room types are: {}.",
                        types.join(", ")
                    )));
                };
                Some((*found).to_string())
            }
            None => None,
        };

        let available: Vec<&Room> = rooms
            .iter()
            .filter(|r| r.available)
            .filter(|r| wanted.as_deref().is_none_or(|t| r.room_type == t))
            .collect();

        if available.is_empty() {
            return Ok(ToolOutput::text(match wanted {
                Some(kind) => format!("No {kind} rooms are available right now."),
                None => "No rooms are available right now.".to_string(),
            }));
        }

        let mut output = String::from("Available rooms:\n");
        for room in available {
            let _ = writeln!(
                output,
                "  Room {} ({}) - {}/night",
                room.number,
                room.room_type,
                format_price(room.rate)
            );
        }

        Ok(ToolOutput::text(output.trim_end()))
    }
}
