//! In-memory Resort Store
//!
//! Seeded with the resort's rooms, facilities and menu. Orders and service
//! requests live for the lifetime of the process.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::RwLock;

use super::ResortStore;
use crate::error::{ConciergeError, Result};
use crate::model::{
    Facility, MenuItem, Order, OrderLine, OrderStatus, RequestStatus, Room, ServiceRequest,
};

#[derive(Default)]
struct Ledger {
    orders: Vec<Order>,
    requests: Vec<ServiceRequest>,
    next_order_id: u64,
    next_request_id: u64,
}

/// In-memory store with sequential ids
pub struct MemoryResortStore {
    rooms: Vec<Room>,
    facilities: Vec<Facility>,
    menu: Vec<MenuItem>,
    ledger: RwLock<Ledger>,
}

impl Default for MemoryResortStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl MemoryResortStore {
    /// A store with no rooms, facilities or menu
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }

    pub fn new(rooms: Vec<Room>, facilities: Vec<Facility>, menu: Vec<MenuItem>) -> Self {
        Self {
            rooms,
            facilities,
            menu,
            ledger: RwLock::new(Ledger {
                next_order_id: 1,
                next_request_id: 1,
                ..Ledger::default()
            }),
        }
    }

    /// The resort as it opens for business
    pub fn seeded() -> Self {
        Self::new(seed_rooms(), seed_facilities(), seed_menu())
    }
}

fn seed_rooms() -> Vec<Room> {
    vec![
        Room::new("101", "Standard", dec!(3500)),
        Room::new("102", "Standard", dec!(3500)).occupied(),
        Room::new("103", "Standard", dec!(3500)),
        Room::new("201", "Deluxe", dec!(5500)),
        Room::new("202", "Deluxe", dec!(5500)).occupied(),
        Room::new("301", "Suite", dec!(9000)),
    ]
}

fn seed_facilities() -> Vec<Facility> {
    vec![
        Facility::new(
            "check-in",
            "Check-in time is 2:00 PM. Early check-in is subject to availability.",
        ),
        Facility::new(
            "check-out",
            "Check-out time is 11:00 AM. Late check-out can be requested at the front desk.",
        ),
        Facility::new(
            "wifi",
            "Complimentary Wi-Fi is available throughout the resort. Network: Resort_Guest; the password is on your key card sleeve.",
        ),
        Facility::new("parking", "Free valet parking is available for all guests, 24 hours."),
        Facility::new("gym", "The gym is on the ground floor and open from 6:00 AM to 10:00 PM."),
        Facility::new(
            "spa",
            "The spa is open from 9:00 AM to 9:00 PM. Treatments can be booked at the front desk.",
        ),
        Facility::new(
            "pool",
            "The pool is open from 7:00 AM to 8:00 PM. Towels are provided poolside.",
        ),
        Facility::new(
            "restaurant",
            "The restaurant serves breakfast 7:00-10:30 AM, lunch 12:30-3:00 PM and dinner 7:00-11:00 PM. Room delivery is available.",
        ),
    ]
}

fn seed_menu() -> Vec<MenuItem> {
    let items: [(&str, &str, Decimal, &str); 23] = [
        ("Idli Sambar", "Steamed rice cakes with lentil soup", dec!(100), "Breakfast"),
        ("Masala Dosa", "Crispy dosa with spiced potato filling", dec!(120), "Breakfast"),
        ("Poha", "Flattened rice with peanuts and spices", dec!(80), "Breakfast"),
        ("Upma", "Savory semolina porridge", dec!(90), "Breakfast"),
        ("Aloo Paratha", "Stuffed flatbread with potato filling", dec!(110), "Breakfast"),
        ("Vada Sambar", "Fried lentil donuts with lentil soup", dec!(100), "Breakfast"),
        ("Pancakes", "Fluffy pancakes with maple syrup", dec!(150), "Breakfast"),
        ("French Toast", "Bread dipped in egg and fried", dec!(130), "Breakfast"),
        ("Omelette", "Three-egg omelette with vegetables", dec!(120), "Breakfast"),
        ("Boiled Eggs", "Two boiled eggs", dec!(70), "Breakfast"),
        ("Bread Butter Jam", "Toast with butter and jam", dec!(60), "Breakfast"),
        ("Cornflakes", "Cornflakes with cold milk", dec!(90), "Breakfast"),
        ("Fresh Fruit Platter", "Seasonal fresh fruits", dec!(140), "Breakfast"),
        ("Tomato Soup", "Roasted tomato soup with croutons", dec!(110), "Starters"),
        ("Paneer Tikka", "Char-grilled cottage cheese with mint chutney", dec!(220), "Starters"),
        ("Paneer Butter Masala", "Cottage cheese in a rich tomato gravy", dec!(250), "Main Course"),
        ("Chicken Biryani", "Basmati rice layered with spiced chicken", dec!(300), "Main Course"),
        ("Dal Makhani", "Slow-cooked black lentils with cream", dec!(200), "Main Course"),
        ("Veg Fried Rice", "Wok-tossed rice with vegetables", dec!(180), "Main Course"),
        ("Gulab Jamun", "Milk dumplings in rose syrup", dec!(90), "Desserts"),
        ("Ice Cream", "Two scoops, vanilla or chocolate", dec!(100), "Desserts"),
        ("Masala Chai", "Spiced Indian tea", dec!(40), "Beverages"),
        ("Fresh Lime Soda", "Sweet or salted", dec!(60), "Beverages"),
    ];

    items
        .into_iter()
        .zip(1..)
        .map(|((name, description, price, category), id)| MenuItem {
            id,
            name: name.into(),
            description: description.into(),
            price,
            category: category.into(),
        })
        .collect()
}

#[async_trait]
impl ResortStore for MemoryResortStore {
    async fn rooms(&self) -> Result<Vec<Room>> {
        Ok(self.rooms.clone())
    }

    async fn facilities(&self) -> Result<Vec<Facility>> {
        Ok(self.facilities.clone())
    }

    async fn menu(&self) -> Result<Vec<MenuItem>> {
        Ok(self.menu.clone())
    }

    async fn place_order(&self, room_number: &str, items: Vec<OrderLine>) -> Result<Order> {
        if items.is_empty() {
            return Err(ConciergeError::InvalidArgument {
                name: "items",
                reason: "an order needs at least one item".into(),
            });
        }

        let mut ledger = self.ledger.write().await;
        let order = Order {
            id: ledger.next_order_id,
            room_number: room_number.to_string(),
            total_amount: Order::total_of(&items),
            items,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        ledger.next_order_id += 1;
        ledger.orders.push(order.clone());

        tracing::info!(order = order.id, room = %order.room_number, total = %order.total_amount, "Order placed");
        Ok(order)
    }

    async fn create_service_request(
        &self,
        room_number: &str,
        request_type: &str,
        details: Option<String>,
    ) -> Result<ServiceRequest> {
        let mut ledger = self.ledger.write().await;
        let request = ServiceRequest {
            id: ledger.next_request_id,
            room_number: room_number.to_string(),
            request_type: request_type.to_string(),
            details,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        };
        ledger.next_request_id += 1;
        ledger.requests.push(request.clone());

        tracing::info!(request = request.id, room = %request.room_number, kind = %request.request_type, "Service request created");
        Ok(request)
    }

    async fn orders(&self) -> Result<Vec<Order>> {
        Ok(self.ledger.read().await.orders.clone())
    }

    async fn service_requests(&self) -> Result<Vec<ServiceRequest>> {
        Ok(self.ledger.read().await.requests.clone())
    }

    async fn update_order_status(&self, id: u64, status: OrderStatus) -> Result<Order> {
        let mut ledger = self.ledger.write().await;
        let order = ledger
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(ConciergeError::OrderNotFound(id))?;
        order.status = status;
        Ok(order.clone())
    }

    async fn update_request_status(
        &self,
        id: u64,
        status: RequestStatus,
    ) -> Result<ServiceRequest> {
        let mut ledger = self.ledger.write().await;
        let request = ledger
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ConciergeError::RequestNotFound(id))?;
        request.status = status;
        Ok(request.clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_menu_has_breakfast() {
        let store = MemoryResortStore::seeded();
        let menu = store.menu().await.unwrap();

        let breakfast: Vec<&MenuItem> = menu.iter().filter(|m| m.category == "Breakfast").collect();
        assert_eq!(breakfast.len(), 13);
        assert!(breakfast.iter().any(|m| m.name == "Masala Dosa" && m.price == dec!(120)));

        let ids: Vec<u64> = menu.iter().map(|m| m.id).collect();
        assert_eq!(ids.first(), Some(&1));
        assert!(ids.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[tokio::test]
    async fn test_orders_get_sequential_ids() {
        let store = MemoryResortStore::seeded();
        let menu = store.menu().await.unwrap();

        let first = store
            .place_order("101", vec![OrderLine::new(&menu[0], 2)])
            .await
            .unwrap();
        let second = store
            .place_order("202", vec![OrderLine::new(&menu[1], 1)])
            .await
            .unwrap();

        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(first.total_amount, dec!(200));
        assert_eq!(first.status, OrderStatus::Pending);
        assert_eq!(store.orders().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_order_is_rejected() {
        let store = MemoryResortStore::seeded();
        let result = store.place_order("101", Vec::new()).await;
        assert!(matches!(result, Err(ConciergeError::InvalidArgument { name: "items", .. })));
    }

    #[tokio::test]
    async fn test_status_updates() {
        let store = MemoryResortStore::empty();
        let request = store
            .create_service_request("305", "towels", Some("two bath towels".into()))
            .await
            .unwrap();
        assert_eq!(request.status, RequestStatus::Pending);

        let updated = store
            .update_request_status(request.id, RequestStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(updated.status, RequestStatus::InProgress);
        assert_eq!(
            store.service_requests().await.unwrap()[0].status,
            RequestStatus::InProgress
        );

        let missing = store.update_order_status(99, OrderStatus::Delivered).await;
        assert!(matches!(missing, Err(ConciergeError::OrderNotFound(99))));
    }
}
