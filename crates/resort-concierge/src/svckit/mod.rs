//! Service Kit - Agent Tools
//!
//! Guest-service tools that implement `agent_core::Tool` over a
//! [`ResortStore`](crate::store::ResortStore).

mod facility_info;
mod menu;
mod restaurant_order;
mod room_availability;
mod room_service;

pub use facility_info::FacilityInfoTool;
pub use menu::MenuTool;
pub use restaurant_order::RestaurantOrderTool;
pub use room_availability::RoomAvailabilityTool;
pub use room_service::RoomServiceTool;

use agent_core::ToolCall;
use serde_json::Value;

use crate::error::{ConciergeError, Result};

/// String argument; models sometimes send numbers for room numbers
fn text_arg(call: &ToolCall, key: &str) -> Option<String> {
    if let Some(text) = call.str_arg(key) {
        return Some(text.to_string());
    }
    match call.arguments.get(key)? {
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required_arg(call: &ToolCall, key: &'static str) -> Result<String> {
    text_arg(call, key).ok_or(ConciergeError::MissingArgument(key))
}
