//! Store wrapper with switchable faults for workflow tests

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::{
    DataSource, MarkRead, Notification, NotificationCreate, Order, OrderCreate, OrderDetail,
    OrderQuery, OrderStatus, OrderUpdate, PendingOrder, PendingOrderCreate, PendingOrderQuery,
    PendingOrderStatus, Shipment, ShipmentCreate, ShipmentQuery, ShipmentUpdate, Vehicle,
    VehicleStatus,
};
use uuid::Uuid;

use super::{MemoryStore, Store, StoreError, StoreResult};

/// Delegates to a seeded [`MemoryStore`] but reports itself as a database
/// so degraded responses are distinguishable. Uses the trait's default
/// `place_order`, so order and shipment inserts are separate calls.
pub(crate) struct FaultyStore {
    inner: MemoryStore,
    unavailable: AtomicBool,
    duplicate_inserts: AtomicU32,
    fail_shipment_insert: AtomicBool,
    fail_remove: AtomicBool,
    fail_notifications: AtomicBool,
    fail_order_status: AtomicBool,
    /// Order numbers seen by `insert_order`, including rejected ones
    pub attempted_numbers: Mutex<Vec<String>>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(100),
            unavailable: AtomicBool::new(false),
            duplicate_inserts: AtomicU32::new(0),
            fail_shipment_insert: AtomicBool::new(false),
            fail_remove: AtomicBool::new(false),
            fail_notifications: AtomicBool::new(false),
            fail_order_status: AtomicBool::new(false),
            attempted_numbers: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with `Unavailable`
    pub fn unavailable() -> Self {
        let store = Self::new();
        store.unavailable.store(true, Ordering::SeqCst);
        store
    }

    /// Reject the next `n` order inserts as duplicates
    pub fn with_duplicates(self, n: u32) -> Self {
        self.duplicate_inserts.store(n, Ordering::SeqCst);
        self
    }

    pub fn with_failing_notifications(self) -> Self {
        self.fail_notifications.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_failing_order_status(self) -> Self {
        self.fail_order_status.store(true, Ordering::SeqCst);
        self
    }

    pub fn recover_order_status(&self) {
        self.fail_order_status.store(false, Ordering::SeqCst);
    }

    /// Shipment insert fails; `compensate` decides whether the order delete works
    pub fn with_failing_shipments(self, compensate: bool) -> Self {
        self.fail_shipment_insert.store(true, Ordering::SeqCst);
        self.fail_remove.store(!compensate, Ordering::SeqCst);
        self
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for FaultyStore {
    fn source(&self) -> DataSource {
        DataSource::Database
    }

    async fn insert_order(&self, order: &OrderCreate) -> StoreResult<Order> {
        self.check()?;
        self.attempted_numbers.lock().push(order.order_number.clone());
        let remaining = self.duplicate_inserts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.duplicate_inserts.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Duplicate("orders_order_number_key".into()));
        }
        self.inner.insert_order(order).await
    }

    async fn remove_order(&self, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("delete rejected".into()));
        }
        self.inner.remove_order(id).await
    }

    async fn insert_shipment(
        &self,
        order: &Order,
        shipment: &ShipmentCreate,
    ) -> StoreResult<Shipment> {
        self.check()?;
        if self.fail_shipment_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("shipment insert rejected".into()));
        }
        self.inner.insert_shipment(order, shipment).await
    }

    async fn list_orders(&self, user_key: &str, query: &OrderQuery) -> StoreResult<Vec<Order>> {
        self.check()?;
        self.inner.list_orders(user_key, query).await
    }

    async fn find_order(&self, user_key: &str, key: &str) -> StoreResult<Option<OrderDetail>> {
        self.check()?;
        self.inner.find_order(user_key, key).await
    }

    async fn update_order(
        &self,
        user_key: &str,
        key: &str,
        update: &OrderUpdate,
    ) -> StoreResult<Option<Order>> {
        self.check()?;
        self.inner.update_order(user_key, key, update).await
    }

    async fn delete_order(&self, user_key: &str, key: &str) -> StoreResult<Option<Order>> {
        self.check()?;
        self.inner.delete_order(user_key, key).await
    }

    async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> StoreResult<()> {
        self.check()?;
        if self.fail_order_status.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("order status write rejected".into()));
        }
        self.inner.set_order_status(order_id, status).await
    }

    async fn list_shipments(
        &self,
        user_key: &str,
        query: &ShipmentQuery,
    ) -> StoreResult<Vec<Shipment>> {
        self.check()?;
        self.inner.list_shipments(user_key, query).await
    }

    async fn find_shipment(&self, user_key: &str, key: &str) -> StoreResult<Option<Shipment>> {
        self.check()?;
        self.inner.find_shipment(user_key, key).await
    }

    async fn update_shipment(
        &self,
        user_key: &str,
        id: Uuid,
        update: &ShipmentUpdate,
    ) -> StoreResult<Option<Shipment>> {
        self.check()?;
        self.inner.update_shipment(user_key, id, update).await
    }

    async fn delete_shipment(&self, user_key: &str, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        self.inner.delete_shipment(user_key, id).await
    }

    async fn insert_notification(
        &self,
        user_key: &str,
        notification: &NotificationCreate,
    ) -> StoreResult<Notification> {
        self.check()?;
        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("notifications table missing".into()));
        }
        self.inner.insert_notification(user_key, notification).await
    }

    async fn list_notifications(
        &self,
        user_key: &str,
        unread_only: bool,
        limit: usize,
    ) -> StoreResult<Vec<Notification>> {
        self.check()?;
        self.inner
            .list_notifications(user_key, unread_only, limit)
            .await
    }

    async fn mark_notifications_read(
        &self,
        user_key: &str,
        target: &MarkRead,
    ) -> StoreResult<u64> {
        self.check()?;
        self.inner.mark_notifications_read(user_key, target).await
    }

    async fn delete_notification(&self, user_key: &str, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        self.inner.delete_notification(user_key, id).await
    }

    async fn insert_pending_order(
        &self,
        user_key: &str,
        order: &PendingOrderCreate,
    ) -> StoreResult<PendingOrder> {
        self.check()?;
        self.inner.insert_pending_order(user_key, order).await
    }

    async fn list_pending_orders(
        &self,
        user_key: &str,
        query: &PendingOrderQuery,
    ) -> StoreResult<Vec<PendingOrder>> {
        self.check()?;
        self.inner.list_pending_orders(user_key, query).await
    }

    async fn set_pending_order_status(
        &self,
        user_key: &str,
        id: Uuid,
        status: PendingOrderStatus,
    ) -> StoreResult<Option<PendingOrder>> {
        self.check()?;
        self.inner.set_pending_order_status(user_key, id, status).await
    }

    async fn delete_pending_order(&self, user_key: &str, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        self.inner.delete_pending_order(user_key, id).await
    }

    async fn list_vehicles(&self, status: Option<VehicleStatus>) -> StoreResult<Vec<Vehicle>> {
        self.check()?;
        self.inner.list_vehicles(status).await
    }

    async fn insert_vehicle(&self, vehicle: &Vehicle) -> StoreResult<Vehicle> {
        self.check()?;
        self.inner.insert_vehicle(vehicle).await
    }

    async fn seed_vehicles(&self, vehicles: &[Vehicle]) -> StoreResult<()> {
        self.check()?;
        self.inner.seed_vehicles(vehicles).await
    }

    async fn set_vehicle_status(&self, id: &str, status: VehicleStatus) -> StoreResult<()> {
        self.check()?;
        self.inner.set_vehicle_status(id, status).await
    }
}
