//! Agent Catalogue
//!
//! The three concierge agents, their system prompts and their tool sets.
//! Registries are built once and shared immutably by every session.

use std::sync::Arc;

use agent_core::ToolRegistry;
use serde::{Deserialize, Serialize};

use crate::store::ResortStore;
use crate::svckit::{
    FacilityInfoTool, MenuTool, RestaurantOrderTool, RoomAvailabilityTool, RoomServiceTool,
};
use crate::{RECEPTIONIST_PROMPT, RESTAURANT_PROMPT, ROOM_SERVICE_PROMPT};

/// Which specialised agent handles a turn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentIdentity {
    /// General queries, room availability, facility info
    #[default]
    Receptionist,
    /// Menu and food orders
    Restaurant,
    /// Cleaning, laundry, amenities
    RoomService,
}

impl AgentIdentity {
    pub const ALL: [Self; 3] = [Self::Receptionist, Self::Restaurant, Self::RoomService];

    /// Label the router prompt asks the model to answer with
    pub const fn label(self) -> &'static str {
        match self {
            Self::Receptionist => "Receptionist",
            Self::Restaurant => "Restaurant",
            Self::RoomService => "RoomService",
        }
    }

    pub const fn system_prompt(self) -> &'static str {
        match self {
            Self::Receptionist => RECEPTIONIST_PROMPT,
            Self::Restaurant => RESTAURANT_PROMPT,
            Self::RoomService => ROOM_SERVICE_PROMPT,
        }
    }
}

impl std::fmt::Display for AgentIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Tool registries per agent
#[derive(Clone)]
pub struct AgentCatalog {
    receptionist: Arc<ToolRegistry>,
    restaurant: Arc<ToolRegistry>,
    room_service: Arc<ToolRegistry>,
}

impl AgentCatalog {
    /// Build every agent's tools over one store
    pub fn new(store: &Arc<dyn ResortStore>) -> Self {
        let mut receptionist = ToolRegistry::new();
        receptionist.register(RoomAvailabilityTool::new(store.clone()));
        receptionist.register(FacilityInfoTool::new(store.clone()));

        let mut restaurant = ToolRegistry::new();
        restaurant.register(MenuTool::new(store.clone()));
        restaurant.register(RestaurantOrderTool::new(store.clone()));

        let mut room_service = ToolRegistry::new();
        room_service.register(RoomServiceTool::new(store.clone()));

        let catalog = Self::from_registries(receptionist, restaurant, room_service);
        for identity in AgentIdentity::ALL {
            let registry = catalog.tools(identity);
            tracing::info!(
                agent = %identity,
                tools = ?registry.names(),
                store = store.name(),
                "Agent tools registered"
            );
        }
        catalog
    }

    /// Catalogue from hand-built registries
    pub fn from_registries(
        receptionist: ToolRegistry,
        restaurant: ToolRegistry,
        room_service: ToolRegistry,
    ) -> Self {
        Self {
            receptionist: Arc::new(receptionist),
            restaurant: Arc::new(restaurant),
            room_service: Arc::new(room_service),
        }
    }

    pub fn tools(&self, identity: AgentIdentity) -> Arc<ToolRegistry> {
        match identity {
            AgentIdentity::Receptionist => self.receptionist.clone(),
            AgentIdentity::Restaurant => self.restaurant.clone(),
            AgentIdentity::RoomService => self.room_service.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryResortStore;

    #[test]
    fn test_tool_sets() {
        let store: Arc<dyn ResortStore> = Arc::new(MemoryResortStore::seeded());
        let catalog = AgentCatalog::new(&store);

        assert_eq!(
            catalog.tools(AgentIdentity::Receptionist).names(),
            vec!["check_room_availability", "get_facility_info"]
        );
        assert_eq!(
            catalog.tools(AgentIdentity::Restaurant).names(),
            vec!["get_menu_items", "place_restaurant_order"]
        );
        assert_eq!(
            catalog.tools(AgentIdentity::RoomService).names(),
            vec!["create_room_service_request"]
        );
    }

    #[test]
    fn test_identity_labels() {
        assert_eq!(AgentIdentity::RoomService.to_string(), "RoomService");
        assert_eq!(AgentIdentity::default(), AgentIdentity::Receptionist);
        assert!(AgentIdentity::Restaurant.system_prompt().starts_with("You are the Resort Restaurant Agent."));
    }
}
