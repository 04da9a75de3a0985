//! Facility Info Tool

use std::sync::Arc;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolOutput, ToolSchema, tool::ParameterSchema};
use async_trait::async_trait;

use super::required_arg;
use crate::model::Facility;
use crate::store::ResortStore;

/// Tool for guest-facing facility information (hours, policies, Wi-Fi)
pub struct FacilityInfoTool {
    store: Arc<dyn ResortStore>,
}

impl FacilityInfoTool {
    pub fn new(store: Arc<dyn ResortStore>) -> Self {
        Self { store }
    }
}

/// Lowercase alphanumerics only, so "Check In", "check-in" and "checkin" agree
fn normalize(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn find_facility<'a>(facilities: &'a [Facility], query: &str) -> Option<&'a Facility> {
    let query = normalize(query);
    if query.is_empty() {
        return None;
    }

    facilities
        .iter()
        .find(|f| normalize(&f.key) == query)
        .or_else(|| {
            facilities.iter().find(|f| {
                let key = normalize(&f.key);
                query.contains(&key) || key.contains(&query)
            })
        })
}

#[async_trait]
impl Tool for FacilityInfoTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_facility_info".into(),
            description: "Get information about resort facilities and policies: check-in, check-out, wifi, parking, gym, spa, pool, restaurant.".into(),
            parameters: vec![ParameterSchema::required(
                "facility",
                "string",
                "Facility or topic (e.g., 'check-in', 'wifi', 'pool')",
            )],
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolOutput> {
        let query = required_arg(call, "facility")?;
        let facilities = self.store.facilities().await?;

        Ok(match find_facility(&facilities, &query) {
            Some(facility) => ToolOutput::text(facility.info.clone()),
            None => {
                tracing::debug!(%query, "No facility matched");
                let known: Vec<&str> = facilities.iter().map(|f| f.key.as_str()).collect();
                ToolOutput::text(format!(
                    "I don't have information about '{query}'. I can help with: {}.",
                    known.join(", ")
                ))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryResortStore;
    use serde_json::json;

    async fn lookup(facility: &str) -> String {
        let tool = FacilityInfoTool::new(Arc::new(MemoryResortStore::seeded()));
        let call = ToolCall::from_json("get_facility_info", &json!({ "facility": facility }));
        tool.execute(&call).await.unwrap().render()
    }

    #[tokio::test]
    async fn test_spelling_variants() {
        assert!(lookup("check-in").await.starts_with("Check-in time is 2:00 PM"));
        assert!(lookup("Check In").await.starts_with("Check-in time is 2:00 PM"));
        assert!(lookup("checkout").await.starts_with("Check-out time is 11:00 AM"));
        assert!(lookup("Wi-Fi").await.contains("Complimentary Wi-Fi"));
    }

    #[tokio::test]
    async fn test_contains_match() {
        assert!(lookup("swimming pool hours").await.starts_with("The pool is open"));
    }

    #[tokio::test]
    async fn test_unknown_facility() {
        let output = lookup("casino").await;
        assert!(output.starts_with("I don't have information about 'casino'"));
        assert!(output.contains("check-in, check-out, wifi"));
    }

    #[tokio::test]
    async fn test_blank_facility_is_a_validation_error() {
        let tool = FacilityInfoTool::new(Arc::new(MemoryResortStore::seeded()));
        let call = ToolCall::from_json("get_facility_info", &json!({ "facility": " " }));
        let result = tool.execute(&call).await;
        assert!(matches!(result, Err(agent_core::AgentError::ToolValidation(_))));
    }
}
