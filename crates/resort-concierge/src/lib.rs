//! # resort-concierge
//!
//! Guest-service agents for a resort: an intent router in front of three
//! specialised agents, each with its own tools.
//!
//! ## Agents
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Guest message ──► IntentRouter                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Receptionist  check_room_availability, get_facility_info   │
//! │  Restaurant    get_menu_items, place_restaurant_order       │
//! │  RoomService   create_room_service_request                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every turn is stateless: the manager builds a fresh session per request
//! and only the latest user message reaches the model.

pub mod agents;
pub mod error;
pub mod manager;
pub mod model;
pub mod router;
pub mod store;
pub mod svckit;

pub use agents::{AgentCatalog, AgentIdentity};
pub use error::{ConciergeError, Result};
pub use manager::{AgentManager, ManagerConfig, RouterFailurePolicy};
pub use model::{MenuItem, Order, OrderLine, OrderStatus, RequestStatus, Room, ServiceRequest};
pub use router::{IntentRouter, parse_intent};
pub use store::{MemoryResortStore, ResortStore};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{
        FacilityInfoTool, MenuTool, RestaurantOrderTool, RoomAvailabilityTool, RoomServiceTool,
    };
}

/// System prompt for intent classification
pub const ROUTER_PROMPT: &str = r"You are the Main Resort Concierge.
Your job is to classify the user's intent and route them to one of three agents:
1. 'Receptionist': General queries, room availability, facility info.
2. 'Restaurant': Food ordering, menu inquiries.
3. 'RoomService': Cleaning, laundry, amenities.

Analyze the user message.
Return ONLY the name of the agent: 'Receptionist', 'Restaurant', or 'RoomService'.
If unsure, default to 'Receptionist'.";

/// System prompt for the receptionist agent
pub const RECEPTIONIST_PROMPT: &str = r#"You are the Resort Receptionist.
Your duties:
1. Answer FAQs (Check-in/out times, Wi-Fi, Parking).
2. Check room availability using the `check_room_availability` tool.
3. Provide facility info (Gym, Spa, Pool, Restaurant) using the `get_facility_info` tool.

Be polite, professional, and welcoming.
If a guest asks about check-in/out, use the `get_facility_info` tool with arguments "check-in" or "check-out".
If a guest asks for food or room service, politely direct them to the Restaurant or Room Service departments, or allow the router to handle it if the user switches context."#;

/// System prompt for the restaurant agent
pub const RESTAURANT_PROMPT: &str = r#"You are the Resort Restaurant Agent.
Your duties: Show the menu, take food orders.
1. When asked for the menu, call the `get_menu_items` tool. **You MUST display the EXACT output returned by the tool.** Do not summarize or just say "Here is the menu". Show the full list.
2. ALWAYS ask for the Room Number before placing an order.
3. When taking an order, confirm the items and calculate the total bill."#;

/// System prompt for the room service agent
pub const ROOM_SERVICE_PROMPT: &str = r"You are the Resort Room Service Agent.
Your duties: Handle requests for cleaning, laundry, and amenities (towels, soap, etc.).
ALWAYS ask for the Room Number before creating a request.
Confirm the request details with the guest.";
