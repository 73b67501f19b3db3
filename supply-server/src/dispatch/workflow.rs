//! Order placement
//!
//! One placement turns a validated request into an order, a shipment on a
//! chosen vehicle, and a best-effort notification. Order and shipment are
//! written as one unit of work through [`Store::place_order`].

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{
    DataSource, Location, Notification, NotificationCreate, NotificationType, Order, OrderCreate,
    OrderItem, OrderItemInput, OrderStatus, PlaceOrderRequest, RouteSelection, Shipment,
    ShipmentCreate, ShipmentStatus, Vehicle, items_total,
};
use uuid::Uuid;

use super::fleet::FleetRegistry;
use super::ids::{generate_order_number, generate_tracking_number};
use super::route::{eta_for, resolve_route};
use crate::auth::Principal;
use crate::db::{Store, StoreError};
use crate::error::{ServiceError, ServiceResult};
use crate::services::NotificationLog;
use crate::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
};

/// Progress recorded on a freshly created shipment
pub const INITIAL_PROGRESS: u8 = 15;

const DEFAULT_CUSTOMER_NAME: &str = "Self";

/// How missing endpoints are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementPolicy {
    /// Origin and destination required, or derivable from the route selection
    Strict,
    /// Missing endpoints fall back to the default corridor
    Lenient,
}

fn default_origin() -> Location {
    Location::new("Mumbai Warehouse", 19.0760, 72.8777)
}

fn default_destination() -> Location {
    Location::new("Pune Distribution", 18.5204, 73.8567)
}

/// Result of a placement
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementOutcome {
    pub order: Order,
    pub shipment: Shipment,
    #[serde(rename = "truck")]
    pub vehicle: Vehicle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(skip)]
    pub source: DataSource,
}

/// Validated placement input, ready to persist
struct Draft {
    items: Vec<OrderItem>,
    total_amount: Decimal,
    item_sum: Decimal,
    origin: Location,
    destination: Location,
}

#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn Store>,
    fleet: FleetRegistry,
    notifications: NotificationLog,
    route_steps: u32,
    max_attempts: u32,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn Store>,
        fleet: FleetRegistry,
        notifications: NotificationLog,
        route_steps: u32,
        max_attempts: u32,
    ) -> Self {
        Self {
            store,
            fleet,
            notifications,
            route_steps,
            max_attempts: max_attempts.max(1),
        }
    }

    pub async fn place_order(
        &self,
        principal: &Principal,
        request: PlaceOrderRequest,
        policy: PlacementPolicy,
    ) -> ServiceResult<PlacementOutcome> {
        let draft = validate(&request, policy)?;
        let item_sum = draft.item_sum;
        let vehicle = self.fleet.pick_available().await?;
        let route = resolve_route(
            request.selected_route.as_ref(),
            &draft.origin,
            &draft.destination,
            self.route_steps,
        );

        let mut order = OrderCreate {
            order_number: String::new(),
            tracking_number: String::new(),
            user_key: principal.user_key.clone(),
            customer_id: request
                .customer_id
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| format!("CUST-{}", shared::util::now_millis())),
            customer_name: request
                .customer_name
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.into()),
            items: draft.items,
            total_amount: draft.total_amount,
            status: OrderStatus::Processing,
            shipping_address: request
                .shipping_address
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| draft.destination.name.clone()),
            delivery_type: request
                .delivery_type
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| vehicle.vehicle_type.clone()),
            assigned_vehicle_id: Some(vehicle.id.clone()),
            vehicle_number: Some(vehicle.vehicle_number.clone()),
            driver_name: Some(vehicle.driver_name.clone()),
            notes: request.notes,
        };
        let mut shipment = ShipmentCreate {
            order_number: String::new(),
            user_key: principal.user_key.clone(),
            vehicle_id: vehicle.id.clone(),
            vehicle_number: vehicle.vehicle_number.clone(),
            driver_name: vehicle.driver_name.clone(),
            vehicle_type: vehicle.vehicle_type.clone(),
            status: ShipmentStatus::PickingUp,
            current_location: draft.origin.point(),
            eta: eta_for(&route),
            route,
            origin: draft.origin,
            destination: draft.destination,
            progress: INITIAL_PROGRESS,
        };

        let placed = self.persist(&mut order, &mut shipment).await;
        let (saved_order, saved_shipment, persisted) = match placed {
            Ok((o, s)) => (o, s, true),
            Err(ServiceError::Store(StoreError::Unavailable(reason))) => {
                tracing::warn!(%reason, order_number = %order.order_number, "Store unavailable, returning unsaved order");
                let (o, s) = unsaved(&order, &shipment);
                (o, s, false)
            }
            Err(e) => return Err(e),
        };
        let source = if persisted {
            self.store.source()
        } else {
            DataSource::Demo
        };

        tracing::info!(
            order_id = %saved_order.id,
            order_number = %saved_order.order_number,
            vehicle_id = %vehicle.id,
            source = ?source,
            "Order placed"
        );
        audit_caller_total(&saved_order, item_sum);

        let notification = self.notify_placed(principal, &saved_order).await;
        if persisted {
            self.fleet.mark_dispatched(&vehicle.id).await;
        }

        Ok(PlacementOutcome {
            order: saved_order,
            shipment: saved_shipment,
            vehicle,
            notification,
            source,
        })
    }

    /// Insert with fresh numbers until the store accepts them
    async fn persist(
        &self,
        order: &mut OrderCreate,
        shipment: &mut ShipmentCreate,
    ) -> ServiceResult<(Order, Shipment)> {
        for attempt in 1..=self.max_attempts {
            order.order_number = generate_order_number();
            order.tracking_number = generate_tracking_number();
            shipment.order_number = order.order_number.clone();

            match self.store.place_order(order, shipment).await {
                Ok(saved) => return Ok(saved),
                Err(StoreError::Duplicate(what)) => {
                    tracing::debug!(attempt, %what, "Order number collided, retrying");
                }
                Err(StoreError::PartialWrite { order_id }) => {
                    return Err(ServiceError::PartialWriteFailure { order_id });
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(ServiceError::DuplicateOrderNumber {
            attempts: self.max_attempts,
        })
    }

    /// Failures are logged and dropped; the order stands either way.
    async fn notify_placed(&self, principal: &Principal, order: &Order) -> Option<Notification> {
        let payload = NotificationCreate {
            kind: NotificationType::Order,
            title: "Order Placed Successfully".into(),
            message: format!(
                "Your order {} has been placed and is being processed. Track it with {}",
                order.order_number, order.tracking_number
            ),
            order_id: Some(order.id),
            order_number: Some(order.order_number.clone()),
            tracking_number: Some(order.tracking_number.clone()),
        };
        match self.notifications.create(&principal.user_key, payload).await {
            Ok((notification, _)) => Some(notification),
            Err(e) => {
                tracing::warn!(order_number = %order.order_number, error = %e, "Failed to record placement notification");
                None
            }
        }
    }
}

fn invalid(msg: impl Into<String>) -> ServiceError {
    ServiceError::InvalidOrder(msg.into())
}

fn validate_items(inputs: &[OrderItemInput]) -> ServiceResult<Vec<OrderItem>> {
    if inputs.is_empty() {
        return Err(invalid("Order must contain at least one item"));
    }
    inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            if input.product_name.trim().is_empty() {
                return Err(invalid(format!("items[{i}].productName is required")));
            }
            if input.product_name.len() > MAX_NAME_LEN {
                return Err(invalid(format!("items[{i}].productName is too long")));
            }
            if input.quantity < 1 {
                return Err(invalid(format!("items[{i}].quantity must be at least 1")));
            }
            if input.unit_price.is_sign_negative() || input.total.is_some_and(|t| t.is_sign_negative()) {
                return Err(invalid(format!("items[{i}] has a negative price")));
            }
            Ok(input.clone().into_item())
        })
        .collect()
}

/// Endpoint derived from the first or last selected coordinate
fn from_selection(selection: Option<&RouteSelection>, last: bool) -> Option<Location> {
    let selection = selection?;
    let coords = selection.coordinates.as_ref()?;
    let (point, name, fallback) = if last {
        (coords.last()?, selection.to.as_deref(), "Destination")
    } else {
        (coords.first()?, selection.from.as_deref(), "Origin")
    };
    Some(Location::new(name.unwrap_or(fallback), point.lat, point.lng))
}

fn resolve_endpoints(
    request: &PlaceOrderRequest,
    policy: PlacementPolicy,
) -> ServiceResult<(Location, Location)> {
    let selection = request.selected_route.as_ref();
    let (origin, destination) = match policy {
        PlacementPolicy::Strict => {
            let origin = request
                .origin
                .clone()
                .or_else(|| from_selection(selection, false));
            let destination = request
                .destination
                .clone()
                .or_else(|| from_selection(selection, true));
            match (origin, destination) {
                (Some(o), Some(d)) => (o, d),
                _ => return Err(invalid("Origin and destination are required")),
            }
        }
        PlacementPolicy::Lenient => (
            request.origin.clone().unwrap_or_else(default_origin),
            request.destination.clone().unwrap_or_else(default_destination),
        ),
    };
    for (label, loc) in [("origin", &origin), ("destination", &destination)] {
        if !loc.point().is_valid() {
            return Err(invalid(format!("{label} coordinates are out of range")));
        }
        if loc.name.trim().is_empty() {
            return Err(invalid(format!("{label} name is required")));
        }
    }
    if let Some(coords) = selection.and_then(|s| s.coordinates.as_ref())
        && coords.iter().any(|p| !p.is_valid())
    {
        return Err(invalid("selectedRoute contains out-of-range coordinates"));
    }
    Ok((origin, destination))
}

/// No side effects: every check runs before the first store call.
fn validate(request: &PlaceOrderRequest, policy: PlacementPolicy) -> ServiceResult<Draft> {
    let items = validate_items(&request.items)?;
    let (origin, destination) = resolve_endpoints(request, policy)?;

    validate_optional_text(&request.customer_name, "customerName", MAX_NAME_LEN)?;
    validate_optional_text(&request.customer_id, "customerId", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&request.shipping_address, "shippingAddress", MAX_ADDRESS_LEN)?;
    validate_optional_text(&request.delivery_type, "deliveryType", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&request.notes, "notes", MAX_NOTE_LEN)?;

    let computed = items_total(&items);
    let total_amount = match request.total_amount {
        Some(given) if given.is_sign_negative() => {
            return Err(invalid("totalAmount must not be negative"));
        }
        Some(given) => given,
        None => computed,
    };

    Ok(Draft {
        items,
        total_amount,
        item_sum: computed,
        origin,
        destination,
    })
}

/// Logs when a caller-supplied total was kept over the item sum.
/// Returns whether the order was flagged.
fn audit_caller_total(order: &Order, item_sum: Decimal) -> bool {
    if order.total_amount == item_sum {
        return false;
    }
    tracing::warn!(
        target: "audit",
        order_number = %order.order_number,
        given = %order.total_amount,
        computed = %item_sum,
        "Caller total differs from item sum"
    );
    true
}

/// In-memory copy of what would have been saved
fn unsaved(order: &OrderCreate, shipment: &ShipmentCreate) -> (Order, Shipment) {
    let now = Utc::now();
    let order = Order {
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
    };
    let shipment = Shipment {
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
    };
    (order, shipment)
}
