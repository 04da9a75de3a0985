//! Restaurant Order Tool
//!
//! Resolves a comma-separated item list against the menu, computes the bill
//! and records the order against the guest's room.

use std::fmt::Write as _;
use std::sync::Arc;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolOutput, ToolSchema, tool::ParameterSchema};
use async_trait::async_trait;
use serde_json::Value;

use super::required_arg;
use crate::error::{ConciergeError, Result};
use crate::model::{MenuItem, Order, OrderLine, format_price};
use crate::store::ResortStore;

/// Tool for placing food orders
pub struct RestaurantOrderTool {
    store: Arc<dyn ResortStore>,
}

impl RestaurantOrderTool {
    pub fn new(store: Arc<dyn ResortStore>) -> Self {
        Self { store }
    }
}

/// Split "2x Masala Dosa" / "2 x Masala Dosa" / "2 Masala Dosa" / "Masala Dosa"
/// into quantity and name
fn parse_entry(entry: &str) -> Result<(u32, &str)> {
    if let Some((head, rest)) = entry.split_once(char::is_whitespace) {
        if let Ok(quantity) = head.trim_end_matches(['x', 'X']).parse::<u32>() {
            let name = strip_times(rest.trim());
            if quantity == 0 {
                return Err(ConciergeError::InvalidArgument {
                    name: "items",
                    reason: format!("quantity for '{name}' must be at least 1"),
                });
            }
            return Ok((quantity, name));
        }
    }
    Ok((1, entry))
}

/// Drop a standalone leading "x" between quantity and name
fn strip_times(name: &str) -> &str {
    match name.split_once(char::is_whitespace) {
        Some((token, tail)) if token.eq_ignore_ascii_case("x") => tail.trim(),
        _ => name,
    }
}

/// Item list from either a comma-separated string or an array of strings
fn item_entries(call: &ToolCall) -> Result<Vec<String>> {
    let entries: Vec<String> = match call.arguments.get("items") {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(_)) => required_arg(call, "items")?
            .split(',')
            .map(str::to_string)
            .collect(),
        _ => return Err(ConciergeError::MissingArgument("items")),
    };

    let entries: Vec<String> = entries
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect();

    if entries.is_empty() {
        return Err(ConciergeError::MissingArgument("items"));
    }
    Ok(entries)
}

/// Match entries against the menu; every unknown name is reported together
fn resolve_lines(entries: &[String], menu: &[MenuItem]) -> Result<Vec<OrderLine>> {
    let mut lines = Vec::with_capacity(entries.len());
    let mut unknown = Vec::new();

    for entry in entries {
        let (quantity, name) = parse_entry(entry)?;
        match menu.iter().find(|m| m.name.eq_ignore_ascii_case(name)) {
            Some(item) => lines.push(OrderLine::new(item, quantity)),
            None => unknown.push(name.to_string()),
        }
    }

    if unknown.is_empty() {
        Ok(lines)
    } else {
        Err(ConciergeError::UnknownMenuItems(unknown))
    }
}

fn receipt(order: &Order) -> String {
    let mut output = format!("Order #{} placed for room {}:\n", order.id, order.room_number);
    for line in &order.items {
        let _ = writeln!(
            output,
            "  {} x {} @ {} = {}",
            line.quantity,
            line.name,
            format_price(line.unit_price),
            format_price(line.subtotal())
        );
    }
    let _ = write!(
        output,
        "Total: {}\nStatus: {}",
        format_price(order.total_amount),
        order.status
    );
    output
}

#[async_trait]
impl Tool for RestaurantOrderTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "place_restaurant_order".into(),
            description: "Place a food order for delivery to a guest room. Returns the order number and total bill.".into(),
            parameters: vec![
                ParameterSchema::required("room_number", "string", "Guest room number"),
                ParameterSchema::required(
                    "items",
                    "string",
                    "Comma-separated menu item names, optionally with quantities (e.g., '2x Masala Dosa, Masala Chai')",
                ),
            ],
            has_side_effects: true,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolOutput> {
        let room_number = required_arg(call, "room_number")?;
        let entries = item_entries(call)?;

        let menu = self.store.menu().await?;
        let lines = resolve_lines(&entries, &menu)?;
        let order = self.store.place_order(&room_number, lines).await?;

        Ok(ToolOutput::text(receipt(&order)))
    }
}
