//! Order Model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geo::{LatLng, Location};
use super::shipment::ShipmentStatus;
use super::UnknownStatus;

/// Order lifecycle status
///
/// `pending → processing → shipped → delivered`, and `cancelled` from any
/// non-terminal state. `delivered` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether an explicit status change from `self` to `next` is allowed.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (from, Cancelled) => !from.is_terminal(),
            (Pending, Processing) | (Processing, Shipped) | (Shipped, Delivered) => true,
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus {
                kind: "order",
                value: other.to_string(),
            }),
        }
    }
}

/// A line item as stored on the order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// A line item as submitted by a caller; `total` may be omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total: Option<Decimal>,
}

impl OrderItemInput {
    pub fn into_item(self) -> OrderItem {
        let total = self
            .total
            .unwrap_or_else(|| self.unit_price * Decimal::from(self.quantity));
        OrderItem {
            product_id: self.product_id,
            product_name: self.product_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total,
        }
    }
}

/// Sum of line totals
pub fn items_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(|i| i.total).sum()
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub tracking_number: String,
    /// Owner (email or subject of the authenticated principal)
    pub user_key: String,
    pub customer_id: String,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub delivery_type: String,
    pub assigned_vehicle_id: Option<String>,
    pub vehicle_number: Option<String>,
    pub driver_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for an order; ids and timestamps are assigned by the store
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub order_number: String,
    pub tracking_number: String,
    pub user_key: String,
    pub customer_id: String,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub delivery_type: String,
    pub assigned_vehicle_id: Option<String>,
    pub vehicle_number: Option<String>,
    pub driver_name: Option<String>,
    pub notes: Option<String>,
}

/// Shipment fields attached to an order detail lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentSummary {
    pub shipment_id: Uuid,
    pub status: ShipmentStatus,
    pub progress: u8,
    pub current_location: LatLng,
    pub eta: String,
    pub origin_name: String,
    pub destination_name: String,
}

/// Order with its shipment summary (if one exists)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub shipment: Option<ShipmentSummary>,
}

/// Update order payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub shipping_address: Option<String>,
    pub delivery_type: Option<String>,
    pub assigned_vehicle_id: Option<String>,
    pub vehicle_number: Option<String>,
    pub driver_name: Option<String>,
    pub notes: Option<String>,
}

impl OrderUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.shipping_address.is_none()
            && self.delivery_type.is_none()
            && self.assigned_vehicle_id.is_none()
            && self.vehicle_number.is_none()
            && self.driver_name.is_none()
            && self.notes.is_none()
    }
}

/// Query parameters for order listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    /// Case-insensitive match on order number, tracking number, customer name
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Caller-chosen route metadata. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSelection {
    pub from: Option<String>,
    pub to: Option<String>,
    pub distance: Option<String>,
    pub time: Option<String>,
    pub savings: Option<String>,
    pub fuel_cost: Option<f64>,
    pub coordinates: Option<Vec<LatLng>>,
}

/// Placement request accepted by both `/orders/place` and `/orders`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_amount: Option<Decimal>,
    pub shipping_address: Option<String>,
    pub delivery_type: Option<String>,
    pub notes: Option<String>,
    pub origin: Option<Location>,
    pub destination: Option<Location>,
    pub selected_route: Option<RouteSelection>,
}
