//! In-memory store adapter
//!
//! Used when no database is configured. State lives for the life of the
//! process and every payload it returns is marked as demo data.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use shared::models::{
    DataSource, MarkRead, Notification, NotificationCreate, Order, OrderCreate, OrderDetail,
    OrderQuery, OrderStatus, OrderUpdate, PendingOrder, PendingOrderCreate, PendingOrderQuery,
    PendingOrderStatus, Shipment, ShipmentCreate, ShipmentQuery, ShipmentUpdate, Vehicle,
    VehicleStatus,
};
use uuid::Uuid;

use super::ring::{NotificationRing, PENDING_ORDER_CAPACITY, PendingOrderRing};
use super::{Store, StoreError, StoreResult, demo, page_bounds};
use crate::auth::DEFAULT_USER_KEY;
use crate::dispatch::fleet::default_fleet;

#[derive(Default)]
struct Tables {
    /// Insertion order; listings sort by `created_at`
    orders: Vec<Order>,
    shipments: Vec<Shipment>,
    vehicles: Vec<Vehicle>,
}

impl Tables {
    fn check_order_unique(&self, order: &OrderCreate) -> StoreResult<()> {
        for existing in &self.orders {
            if existing.order_number == order.order_number {
                return Err(StoreError::Duplicate("order_number".into()));
            }
            if existing.tracking_number == order.tracking_number {
                return Err(StoreError::Duplicate("tracking_number".into()));
            }
        }
        Ok(())
    }

    fn order_index(&self, user_key: &str, key: &str) -> Option<usize> {
        self.orders
            .iter()
            .position(|o| o.user_key == user_key && order_matches(o, key))
    }

    fn shipment_for(&self, order_id: Uuid) -> Option<&Shipment> {
        self.shipments.iter().find(|s| s.order_id == order_id)
    }
}

fn order_matches(order: &Order, key: &str) -> bool {
    order.order_number == key || Uuid::parse_str(key).is_ok_and(|id| id == order.id)
}

fn shipment_matches(shipment: &Shipment, key: &str) -> bool {
    shipment.order_number == key || Uuid::parse_str(key).is_ok_and(|id| id == shipment.id)
}

fn build_order(order: &OrderCreate) -> Order {
    let now = Utc::now();
    Order {
        id: Uuid::new_v4(),
        order_number: order.order_number.clone(),
        tracking_number: order.tracking_number.clone(),
        user_key: order.user_key.clone(),
        customer_id: order.customer_id.clone(),
        customer_name: order.customer_name.clone(),
        items: order.items.clone(),
        total_amount: order.total_amount,
        status: order.status,
        shipping_address: order.shipping_address.clone(),
        delivery_type: order.delivery_type.clone(),
        assigned_vehicle_id: order.assigned_vehicle_id.clone(),
        vehicle_number: order.vehicle_number.clone(),
        driver_name: order.driver_name.clone(),
        notes: order.notes.clone(),
        created_at: now,
        updated_at: now,
    }
}

fn build_shipment(order: &Order, shipment: &ShipmentCreate) -> Shipment {
    let now = Utc::now();
    Shipment {
        id: Uuid::new_v4(),
        order_id: order.id,
        order_number: shipment.order_number.clone(),
        user_key: shipment.user_key.clone(),
        vehicle_id: shipment.vehicle_id.clone(),
        vehicle_number: shipment.vehicle_number.clone(),
        driver_name: shipment.driver_name.clone(),
        vehicle_type: shipment.vehicle_type.clone(),
        status: shipment.status,
        origin: shipment.origin.clone(),
        destination: shipment.destination.clone(),
        current_location: shipment.current_location,
        route: shipment.route.clone(),
        eta: shipment.eta.clone(),
        progress: shipment.progress,
        created_at: now,
        updated_at: now,
    }
}

fn apply_order_update(order: &mut Order, update: &OrderUpdate) {
    if let Some(status) = update.status {
        order.status = status;
    }
    if let Some(v) = &update.shipping_address {
        order.shipping_address = v.clone();
    }
    if let Some(v) = &update.delivery_type {
        order.delivery_type = v.clone();
    }
    if let Some(v) = &update.assigned_vehicle_id {
        order.assigned_vehicle_id = Some(v.clone());
    }
    if let Some(v) = &update.vehicle_number {
        order.vehicle_number = Some(v.clone());
    }
    if let Some(v) = &update.driver_name {
        order.driver_name = Some(v.clone());
    }
    if let Some(v) = &update.notes {
        order.notes = Some(v.clone());
    }
    order.updated_at = Utc::now();
}

fn apply_shipment_update(shipment: &mut Shipment, update: &ShipmentUpdate) {
    if let Some(status) = update.status {
        shipment.status = status;
    }
    if let Some(progress) = update.progress {
        shipment.progress = progress;
    }
    if let Some(lat) = update.current_lat {
        shipment.current_location.lat = lat;
    }
    if let Some(lng) = update.current_lng {
        shipment.current_location.lng = lng;
    }
    if let Some(eta) = &update.eta {
        shipment.eta = eta.clone();
    }
    shipment.updated_at = Utc::now();
}

/// Stamp a queued line item with its id, owner and creation time
pub(crate) fn build_pending_order(user_key: &str, order: &PendingOrderCreate) -> PendingOrder {
    PendingOrder {
        id: Uuid::new_v4(),
        user_key: user_key.to_string(),
        product_id: order.product_id.clone(),
        product_name: order.product_name.clone(),
        quantity: order.quantity,
        unit_price: order.unit_price,
        total: order.total,
        recommendation: Some(order.recommendation.clone()),
        source: order.source.clone(),
        status: PendingOrderStatus::Pending,
        created_at: Utc::now(),
    }
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
    notifications: NotificationRing,
    pending_orders: PendingOrderRing,
}

impl MemoryStore {
    /// Seeded with the default fleet and the demo user's sample records.
    pub fn new(notification_capacity: usize) -> Self {
        let mut tables = Tables {
            vehicles: default_fleet(),
            ..Default::default()
        };
        // Oldest first so later inserts land after them
        for (order, shipment) in demo::records(DEFAULT_USER_KEY).into_iter().rev() {
            tables.orders.push(order);
            tables.shipments.push(shipment);
        }
        let notifications = NotificationRing::new(notification_capacity);
        for n in demo::notifications(DEFAULT_USER_KEY).into_iter().rev() {
            notifications.push(n);
        }
        Self {
            tables: Mutex::new(tables),
            notifications,
            pending_orders: PendingOrderRing::new(PENDING_ORDER_CAPACITY),
        }
    }

    /// Start without any seeded records or vehicles
    pub fn empty(notification_capacity: usize) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            notifications: NotificationRing::new(notification_capacity),
            pending_orders: PendingOrderRing::new(PENDING_ORDER_CAPACITY),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn source(&self) -> DataSource {
        DataSource::Demo
    }

    async fn insert_order(&self, order: &OrderCreate) -> StoreResult<Order> {
        let mut tables = self.tables.lock();
        tables.check_order_unique(order)?;
        let saved = build_order(order);
        tables.orders.push(saved.clone());
        Ok(saved)
    }

    async fn remove_order(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.lock();
        let before = tables.orders.len();
        tables.orders.retain(|o| o.id != id);
        tables.shipments.retain(|s| s.order_id != id);
        Ok(tables.orders.len() != before)
    }

    async fn insert_shipment(
        &self,
        order: &Order,
        shipment: &ShipmentCreate,
    ) -> StoreResult<Shipment> {
        let mut tables = self.tables.lock();
        if !tables.orders.iter().any(|o| o.id == order.id) {
            return Err(StoreError::Backend(
                format!("order {} does not exist", order.id).into(),
            ));
        }
        let saved = build_shipment(order, shipment);
        tables.shipments.push(saved.clone());
        Ok(saved)
    }

    async fn place_order(
        &self,
        order: &OrderCreate,
        shipment: &ShipmentCreate,
    ) -> StoreResult<(Order, Shipment)> {
        let mut tables = self.tables.lock();
        tables.check_order_unique(order)?;
        let saved_order = build_order(order);
        let saved_shipment = build_shipment(&saved_order, shipment);
        tables.orders.push(saved_order.clone());
        tables.shipments.push(saved_shipment.clone());
        Ok((saved_order, saved_shipment))
    }

    async fn list_orders(&self, user_key: &str, query: &OrderQuery) -> StoreResult<Vec<Order>> {
        let (limit, offset) = page_bounds(query);
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let tables = self.tables.lock();
        let mut rows: Vec<Order> = tables
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_key == user_key)
            .filter(|o| query.status.is_none_or(|s| o.status == s))
            .filter(|o| {
                needle.as_ref().is_none_or(|n| {
                    o.order_number.to_lowercase().contains(n)
                        || o.tracking_number.to_lowercase().contains(n)
                        || o.customer_name.to_lowercase().contains(n)
                })
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_order(&self, user_key: &str, key: &str) -> StoreResult<Option<OrderDetail>> {
        let tables = self.tables.lock();
        Ok(tables.order_index(user_key, key).map(|idx| {
            let order = tables.orders[idx].clone();
            let shipment = tables.shipment_for(order.id).map(Shipment::summary);
            OrderDetail { order, shipment }
        }))
    }

    async fn update_order(
        &self,
        user_key: &str,
        key: &str,
        update: &OrderUpdate,
    ) -> StoreResult<Option<Order>> {
        let mut tables = self.tables.lock();
        Ok(tables.order_index(user_key, key).map(|idx| {
            let order = &mut tables.orders[idx];
            apply_order_update(order, update);
            order.clone()
        }))
    }

    async fn delete_order(&self, user_key: &str, key: &str) -> StoreResult<Option<Order>> {
        let mut tables = self.tables.lock();
        Ok(tables.order_index(user_key, key).map(|idx| {
            let removed = tables.orders.remove(idx);
            tables.shipments.retain(|s| s.order_id != removed.id);
            removed
        }))
    }

    async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        if let Some(order) = tables.orders.iter_mut().find(|o| o.id == order_id) {
            order.status = status;
            order.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list_shipments(
        &self,
        user_key: &str,
        query: &ShipmentQuery,
    ) -> StoreResult<Vec<Shipment>> {
        let tables = self.tables.lock();
        let mut rows: Vec<Shipment> = tables
            .shipments
            .iter()
            .rev()
            .filter(|s| s.user_key == user_key && query.matches(s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_shipment(&self, user_key: &str, key: &str) -> StoreResult<Option<Shipment>> {
        let tables = self.tables.lock();
        Ok(tables
            .shipments
            .iter()
            .find(|s| s.user_key == user_key && shipment_matches(s, key))
            .cloned())
    }

    async fn update_shipment(
        &self,
        user_key: &str,
        id: Uuid,
        update: &ShipmentUpdate,
    ) -> StoreResult<Option<Shipment>> {
        let mut tables = self.tables.lock();
        Ok(tables
            .shipments
            .iter_mut()
            .find(|s| s.id == id && s.user_key == user_key)
            .map(|s| {
                apply_shipment_update(s, update);
                s.clone()
            }))
    }

    async fn delete_shipment(&self, user_key: &str, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.lock();
        let before = tables.shipments.len();
        tables
            .shipments
            .retain(|s| !(s.id == id && s.user_key == user_key));
        Ok(tables.shipments.len() != before)
    }

    async fn insert_notification(
        &self,
        user_key: &str,
        notification: &NotificationCreate,
    ) -> StoreResult<Notification> {
        let saved = Notification {
            id: Uuid::new_v4(),
            user_key: user_key.to_string(),
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            order_id: notification.order_id,
            order_number: notification.order_number.clone(),
            tracking_number: notification.tracking_number.clone(),
            read: false,
            created_at: Utc::now(),
        };
        self.notifications.push(saved.clone());
        Ok(saved)
    }

    async fn list_notifications(
        &self,
        user_key: &str,
        unread_only: bool,
        limit: usize,
    ) -> StoreResult<Vec<Notification>> {
        Ok(self.notifications.list(user_key, unread_only, limit))
    }

    async fn mark_notifications_read(
        &self,
        user_key: &str,
        target: &MarkRead,
    ) -> StoreResult<u64> {
        Ok(self.notifications.mark_read(user_key, target))
    }

    async fn delete_notification(&self, user_key: &str, id: Uuid) -> StoreResult<bool> {
        Ok(self.notifications.remove(user_key, id))
    }

    async fn insert_pending_order(
        &self,
        user_key: &str,
        order: &PendingOrderCreate,
    ) -> StoreResult<PendingOrder> {
        let saved = build_pending_order(user_key, order);
        self.pending_orders.push(saved.clone());
        Ok(saved)
    }

    async fn list_pending_orders(
        &self,
        user_key: &str,
        query: &PendingOrderQuery,
    ) -> StoreResult<Vec<PendingOrder>> {
        Ok(self.pending_orders.list(user_key, query))
    }

    async fn set_pending_order_status(
        &self,
        user_key: &str,
        id: Uuid,
        status: PendingOrderStatus,
    ) -> StoreResult<Option<PendingOrder>> {
        Ok(self.pending_orders.set_status(user_key, id, status))
    }

    async fn delete_pending_order(&self, user_key: &str, id: Uuid) -> StoreResult<bool> {
        Ok(self.pending_orders.remove(user_key, id))
    }

    async fn list_vehicles(&self, status: Option<VehicleStatus>) -> StoreResult<Vec<Vehicle>> {
        let tables = self.tables.lock();
        let mut rows: Vec<Vehicle> = tables
            .vehicles
            .iter()
            .filter(|v| status.is_none_or(|s| v.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }

    async fn insert_vehicle(&self, vehicle: &Vehicle) -> StoreResult<Vehicle> {
        let mut tables = self.tables.lock();
        if tables.vehicles.iter().any(|v| v.id == vehicle.id) {
            return Err(StoreError::Duplicate("vehicle id".into()));
        }
        if tables
            .vehicles
            .iter()
            .any(|v| v.vehicle_number == vehicle.vehicle_number)
        {
            return Err(StoreError::Duplicate("vehicle_number".into()));
        }
        tables.vehicles.push(vehicle.clone());
        Ok(vehicle.clone())
    }

    async fn seed_vehicles(&self, vehicles: &[Vehicle]) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        for v in vehicles {
            if !tables.vehicles.iter().any(|existing| existing.id == v.id) {
                tables.vehicles.push(v.clone());
            }
        }
        Ok(())
    }

    async fn set_vehicle_status(&self, id: &str, status: VehicleStatus) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        if let Some(v) = tables.vehicles.iter_mut().find(|v| v.id == id) {
            v.status = status;
        }
        Ok(())
    }
}
