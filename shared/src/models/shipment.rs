//! Shipment Model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geo::{LatLng, Location};
use super::order::{OrderStatus, ShipmentSummary};
use super::UnknownStatus;

/// Shipment lifecycle status: `picking_up → in_transit → delivered`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    PickingUp,
    InTransit,
    Delivered,
}

impl ShipmentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PickingUp => "picking_up",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::PickingUp => 0,
            Self::InTransit => 1,
            Self::Delivered => 2,
        }
    }

    /// Forward moves only. Re-asserting the current status is allowed so
    /// progress and location updates can carry it.
    pub fn can_transition_to(&self, next: ShipmentStatus) -> bool {
        next.rank() >= self.rank()
    }

    /// Order status forced by a shipment entering this status
    pub const fn cascaded_order_status(&self) -> Option<OrderStatus> {
        match self {
            Self::PickingUp => None,
            Self::InTransit => Some(OrderStatus::Shipped),
            Self::Delivered => Some(OrderStatus::Delivered),
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "picking_up" => Ok(Self::PickingUp),
            "in_transit" => Ok(Self::InTransit),
            "delivered" => Ok(Self::Delivered),
            other => Err(UnknownStatus {
                kind: "shipment",
                value: other.to_string(),
            }),
        }
    }
}

/// Route metadata plus the polyline drawn on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub from: String,
    pub to: String,
    pub distance: String,
    pub time: String,
    pub savings: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_cost: Option<f64>,
    #[serde(default)]
    pub coordinates: Vec<LatLng>,
}

/// Shipment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub order_number: String,
    pub user_key: String,
    pub vehicle_id: String,
    pub vehicle_number: String,
    pub driver_name: String,
    pub vehicle_type: String,
    pub status: ShipmentStatus,
    pub origin: Location,
    pub destination: Location,
    pub current_location: LatLng,
    pub route: RouteInfo,
    pub eta: String,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shipment {
    /// The subset embedded in order detail responses
    pub fn summary(&self) -> ShipmentSummary {
        ShipmentSummary {
            shipment_id: self.id,
            status: self.status,
            progress: self.progress,
            current_location: self.current_location,
            eta: self.eta.clone(),
            origin_name: self.origin.name.clone(),
            destination_name: self.destination.name.clone(),
        }
    }
}

/// Insert payload for a shipment. `order_id` is filled in by the store
/// inside the placement unit of work.
#[derive(Debug, Clone)]
pub struct ShipmentCreate {
    pub order_number: String,
    pub user_key: String,
    pub vehicle_id: String,
    pub vehicle_number: String,
    pub driver_name: String,
    pub vehicle_type: String,
    pub status: ShipmentStatus,
    pub origin: Location,
    pub destination: Location,
    pub current_location: LatLng,
    pub route: RouteInfo,
    pub eta: String,
    pub progress: u8,
}

/// Update shipment payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentUpdate {
    pub status: Option<ShipmentStatus>,
    pub progress: Option<u8>,
    pub current_lat: Option<f64>,
    pub current_lng: Option<f64>,
    pub eta: Option<String>,
}

impl ShipmentUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.progress.is_none()
            && self.current_lat.is_none()
            && self.current_lng.is_none()
            && self.eta.is_none()
    }
}

/// Query parameters for shipment listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipmentQuery {
    pub status: Option<ShipmentStatus>,
    /// `true` excludes delivered shipments
    pub active: Option<bool>,
}

impl ShipmentQuery {
    pub fn matches(&self, shipment: &Shipment) -> bool {
        if let Some(status) = self.status
            && shipment.status != status
        {
            return false;
        }
        !(self.active == Some(true) && shipment.status == ShipmentStatus::Delivered)
    }
}
