//! Menu Tool
//!
//! Renders the restaurant menu grouped by category. The restaurant agent is
//! told to show this output verbatim, so the format is guest-facing.

use std::fmt::Write as _;
use std::sync::Arc;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolOutput, ToolSchema, tool::ParameterSchema};
use async_trait::async_trait;

use super::text_arg;
use crate::model::{MenuItem, format_price};
use crate::store::ResortStore;

/// Tool for listing the menu
pub struct MenuTool {
    store: Arc<dyn ResortStore>,
}

impl MenuTool {
    pub fn new(store: Arc<dyn ResortStore>) -> Self {
        Self { store }
    }
}

/// Group items by category, keeping first-seen category order
fn group_by_category(items: &[MenuItem]) -> Vec<(&str, Vec<&MenuItem>)> {
    let mut groups: Vec<(&str, Vec<&MenuItem>)> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|(c, _)| *c == item.category) {
            Some((_, members)) => members.push(item),
            None => groups.push((item.category.as_str(), vec![item])),
        }
    }
    groups
}

fn render_menu(groups: &[(&str, Vec<&MenuItem>)]) -> String {
    let mut output = String::new();
    for (category, items) in groups {
        let _ = writeln!(output, "{category}:");
        for item in items {
            let _ = writeln!(
                output,
                "  - {} ({}): {}",
                item.name,
                format_price(item.price),
                item.description
            );
        }
        output.push('\n');
    }
    output.trim_end().to_string()
}

#[async_trait]
impl Tool for MenuTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_menu_items".into(),
            description: "Get the restaurant menu with prices, grouped by category. Optionally only one category.".into(),
            parameters: vec![ParameterSchema::optional(
                "category",
                "string",
                "Menu category (e.g., 'Breakfast', 'Main Course')",
            )],
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolOutput> {
        let menu = self.store.menu().await?;
        if menu.is_empty() {
            return Ok(ToolOutput::empty());
        }

        let groups = group_by_category(&menu);
        let Some(category) = text_arg(call, "category") else {
            return Ok(ToolOutput::text(render_menu(&groups)));
        };

        let selected: Vec<(&str, Vec<&MenuItem>)> = groups
            .iter()
            .filter(|(c, _)| c.eq_ignore_ascii_case(&category))
            .cloned()
            .collect();

        if selected.is_empty() {
            let categories: Vec<&str> = groups.iter().map(|(c, _)| *c).collect();
            return Ok(ToolOutput::text(format!(
                "There is no '{category}' section on the menu. Sections: {}.",
                categories.join(", ")
            )));
        }

        Ok(ToolOutput::text(render_menu(&selected)))
    }
}
