//! Persistence layer
//!
//! [`Store`] is the single seam between the workflow and storage. The
//! adapter (PostgreSQL or in-memory) is picked once at startup; nothing
//! above this module asks which one it got.

pub mod demo;
pub mod memory;
pub mod postgres;
pub mod ring;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use shared::models::{
    DataSource, MarkRead, Notification, NotificationCreate, Order, OrderCreate, OrderDetail,
    OrderQuery, OrderStatus, OrderUpdate, PendingOrder, PendingOrderCreate, PendingOrderQuery,
    PendingOrderStatus, Shipment, ShipmentCreate, ShipmentQuery, ShipmentUpdate, Vehicle,
    VehicleStatus,
};
use uuid::Uuid;

use crate::BoxError;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Default page size for order listings, also the hard cap
pub const MAX_ORDER_PAGE: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connection refused, pool exhausted, or the call timed out
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// A unique constraint rejected the write
    #[error("duplicate value for {0}")]
    Duplicate(String),
    /// The order committed but the shipment did not and the order could not be removed
    #[error("order {order_id} committed without its shipment")]
    PartialWrite { order_id: Uuid },
    #[error("store error: {0}")]
    Backend(BoxError),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// `key` arguments accept either the row UUID or the human-facing order number.
#[async_trait]
pub trait Store: Send + Sync {
    /// Reported alongside payloads so clients can tell durable data from demo data
    fn source(&self) -> DataSource;

    // ── Orders ──

    async fn insert_order(&self, order: &OrderCreate) -> StoreResult<Order>;

    /// Removes an order by id regardless of owner. Used for compensation.
    async fn remove_order(&self, id: Uuid) -> StoreResult<bool>;

    async fn insert_shipment(&self, order: &Order, shipment: &ShipmentCreate)
    -> StoreResult<Shipment>;

    /// Persist an order and its shipment as one unit.
    ///
    /// Adapters with transactions override this. The default inserts
    /// sequentially and deletes the order if the shipment insert fails.
    async fn place_order(
        &self,
        order: &OrderCreate,
        shipment: &ShipmentCreate,
    ) -> StoreResult<(Order, Shipment)> {
        let saved = self.insert_order(order).await?;
        match self.insert_shipment(&saved, shipment).await {
            Ok(shipment) => Ok((saved, shipment)),
            Err(err) => {
                tracing::warn!(order_id = %saved.id, error = %err, "Shipment insert failed, removing order");
                match self.remove_order(saved.id).await {
                    Ok(true) => Err(err),
                    Ok(false) | Err(_) => Err(StoreError::PartialWrite { order_id: saved.id }),
                }
            }
        }
    }

    async fn list_orders(&self, user_key: &str, query: &OrderQuery) -> StoreResult<Vec<Order>>;

    async fn find_order(&self, user_key: &str, key: &str) -> StoreResult<Option<OrderDetail>>;

    async fn update_order(
        &self,
        user_key: &str,
        key: &str,
        update: &OrderUpdate,
    ) -> StoreResult<Option<Order>>;

    async fn delete_order(&self, user_key: &str, key: &str) -> StoreResult<Option<Order>>;

    async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> StoreResult<()>;

    // ── Shipments ──

    async fn list_shipments(
        &self,
        user_key: &str,
        query: &ShipmentQuery,
    ) -> StoreResult<Vec<Shipment>>;

    async fn find_shipment(&self, user_key: &str, key: &str) -> StoreResult<Option<Shipment>>;

    async fn update_shipment(
        &self,
        user_key: &str,
        id: Uuid,
        update: &ShipmentUpdate,
    ) -> StoreResult<Option<Shipment>>;

    async fn delete_shipment(&self, user_key: &str, id: Uuid) -> StoreResult<bool>;

    // ── Notifications ──

    async fn insert_notification(
        &self,
        user_key: &str,
        notification: &NotificationCreate,
    ) -> StoreResult<Notification>;

    /// Newest first, at most `limit` rows
    async fn list_notifications(
        &self,
        user_key: &str,
        unread_only: bool,
        limit: usize,
    ) -> StoreResult<Vec<Notification>>;

    async fn mark_notifications_read(&self, user_key: &str, target: &MarkRead)
    -> StoreResult<u64>;

    async fn delete_notification(&self, user_key: &str, id: Uuid) -> StoreResult<bool>;

    // ── Pending orders ──

    async fn insert_pending_order(
        &self,
        user_key: &str,
        order: &PendingOrderCreate,
    ) -> StoreResult<PendingOrder>;

    /// Newest first
    async fn list_pending_orders(
        &self,
        user_key: &str,
        query: &PendingOrderQuery,
    ) -> StoreResult<Vec<PendingOrder>>;

    async fn set_pending_order_status(
        &self,
        user_key: &str,
        id: Uuid,
        status: PendingOrderStatus,
    ) -> StoreResult<Option<PendingOrder>>;

    async fn delete_pending_order(&self, user_key: &str, id: Uuid) -> StoreResult<bool>;

    // ── Vehicles ──

    /// Ordered by id
    async fn list_vehicles(&self, status: Option<VehicleStatus>) -> StoreResult<Vec<Vehicle>>;

    async fn insert_vehicle(&self, vehicle: &Vehicle) -> StoreResult<Vehicle>;

    /// Insert any of `vehicles` whose id is not yet present
    async fn seed_vehicles(&self, vehicles: &[Vehicle]) -> StoreResult<()>;

    async fn set_vehicle_status(&self, id: &str, status: VehicleStatus) -> StoreResult<()>;
}

/// Clamp caller pagination to the listing cap
pub(crate) fn page_bounds(query: &OrderQuery) -> (u32, u32) {
    let limit = query.limit.unwrap_or(MAX_ORDER_PAGE).clamp(1, MAX_ORDER_PAGE);
    (limit, query.offset.unwrap_or(0))
}
