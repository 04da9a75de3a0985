//! Resort Store
//!
//! Persistence boundary for everything the guest-service tools read and
//! write, and what the operations endpoints list and update.

mod memory;

pub use memory::MemoryResortStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{
    Facility, MenuItem, Order, OrderLine, OrderStatus, RequestStatus, Room, ServiceRequest,
};

/// Resort data access (Strategy pattern)
///
/// Implement this for each backing store: in-memory, SQL, a PMS API.
#[async_trait]
pub trait ResortStore: Send + Sync {
    /// All rooms, available or not
    async fn rooms(&self) -> Result<Vec<Room>>;

    async fn facilities(&self) -> Result<Vec<Facility>>;

    /// Menu in display order
    async fn menu(&self) -> Result<Vec<MenuItem>>;

    /// Persist a new order with status `Pending`
    async fn place_order(&self, room_number: &str, items: Vec<OrderLine>) -> Result<Order>;

    /// Persist a new service request with status `Pending`
    async fn create_service_request(
        &self,
        room_number: &str,
        request_type: &str,
        details: Option<String>,
    ) -> Result<ServiceRequest>;

    async fn orders(&self) -> Result<Vec<Order>>;

    async fn service_requests(&self) -> Result<Vec<ServiceRequest>>;

    async fn update_order_status(&self, id: u64, status: OrderStatus) -> Result<Order>;

    async fn update_request_status(&self, id: u64, status: RequestStatus)
    -> Result<ServiceRequest>;

    /// Store name, for logs and health output
    fn name(&self) -> &str;
}
