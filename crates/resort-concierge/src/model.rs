//! Domain Models
//!
//! Rooms, facilities, the menu, restaurant orders and room-service requests.
//! All prices and bills are `rust_decimal::Decimal`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Render an amount the way guests see it on a bill
pub fn format_price(amount: Decimal) -> String {
    format!("₹{}", amount.normalize())
}

/// A guest room
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room number (e.g., "101")
    pub number: String,

    /// Room category (e.g., "Standard", "Deluxe", "Suite")
    pub room_type: String,

    /// Nightly rate
    pub rate: Decimal,

    pub available: bool,
}

impl Room {
    pub fn new(number: impl Into<String>, room_type: impl Into<String>, rate: Decimal) -> Self {
        Self {
            number: number.into(),
            room_type: room_type.into(),
            rate,
            available: true,
        }
    }

    #[must_use]
    pub const fn occupied(mut self) -> Self {
        self.available = false;
        self
    }
}

/// A resort facility with guest-facing information
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    /// Lookup key (e.g., "check-in", "wifi")
    pub key: String,

    pub info: String,
}

impl Facility {
    pub fn new(key: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            info: info.into(),
        }
    }
}

/// An item on the restaurant menu
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: Decimal,

    /// Menu section (e.g., "Breakfast", "Main Course")
    pub category: String,
}

/// One line of a restaurant order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderLine {
    pub fn new(item: &MenuItem, quantity: u32) -> Self {
        Self {
            name: item.name.clone(),
            quantity,
            unit_price: item.price,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Kitchen workflow state of an order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Preparing => write!(f, "Preparing"),
            Self::Delivered => write!(f, "Delivered"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A restaurant order charged to a room
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub room_number: String,
    pub items: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Sum of all line subtotals
    pub fn total_of(items: &[OrderLine]) -> Decimal {
        items.iter().map(OrderLine::subtotal).sum()
    }
}

/// Housekeeping workflow state of a service request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A room-service request (cleaning, laundry, amenities)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: u64,
    pub room_number: String,

    /// Kind of request (e.g., "cleaning", "towels")
    pub request_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_total() {
        let dosa = MenuItem {
            id: 1,
            name: "Masala Dosa".into(),
            description: "Crispy dosa with spiced potato filling".into(),
            price: dec!(120),
            category: "Breakfast".into(),
        };
        let lines = vec![OrderLine::new(&dosa, 2), OrderLine::new(&dosa, 1)];
        assert_eq!(Order::total_of(&lines), dec!(360));
        assert_eq!(format_price(dec!(360.00)), "₹360");
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        let status: OrderStatus = serde_json::from_str("\"Delivered\"").unwrap();
        assert_eq!(status, OrderStatus::Delivered);
        assert!(serde_json::from_str::<OrderStatus>("\"Lost\"").is_err());
        assert_eq!(RequestStatus::InProgress.to_string(), "In Progress");
    }
}
