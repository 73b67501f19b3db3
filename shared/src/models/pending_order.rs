//! Pending Order Model
//!
//! Line items queued from demand forecasts, waiting to be turned into
//! real orders. They carry no route or vehicle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UnknownStatus;

pub const DEFAULT_PRODUCT_NAME: &str = "Product";
pub const DEFAULT_RECOMMENDATION: &str = "From Demand Forecast";
pub const DEFAULT_SOURCE: &str = "demand_forecasting";

/// Any status may follow any other; the queue has no state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingOrderStatus {
    #[default]
    Pending,
    ReadyForShipment,
    Processing,
    Completed,
}

impl PendingOrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::ReadyForShipment => "ready_for_shipment",
            Self::Processing => "processing",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for PendingOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PendingOrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "ready_for_shipment" => Ok(Self::ReadyForShipment),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownStatus {
                kind: "pending order",
                value: other.to_string(),
            }),
        }
    }
}

/// Pending order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub id: Uuid,
    pub user_key: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub recommendation: Option<String>,
    pub source: String,
    pub status: PendingOrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Queue request as submitted by a caller; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrderInput {
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<u32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub unit_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total: Option<Decimal>,
    pub recommendation: Option<String>,
    pub source: Option<String>,
}

/// Insert payload with every default resolved
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOrderCreate {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub recommendation: String,
    pub source: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl PendingOrderInput {
    /// Fill defaults. Zero quantity, price and total count as absent, and
    /// the total falls back to `quantity * unit_price`.
    pub fn into_create(self, stamp_millis: i64) -> PendingOrderCreate {
        let quantity = self.quantity.filter(|q| *q > 0).unwrap_or(1);
        let unit_price = self.unit_price.unwrap_or(Decimal::ZERO);
        let total = self
            .total
            .filter(|t| !t.is_zero())
            .unwrap_or_else(|| unit_price * Decimal::from(quantity));
        PendingOrderCreate {
            product_id: non_blank(self.product_id).unwrap_or_else(|| format!("PROD-{stamp_millis}")),
            product_name: non_blank(self.product_name).unwrap_or_else(|| DEFAULT_PRODUCT_NAME.into()),
            quantity,
            unit_price,
            total,
            recommendation: non_blank(self.recommendation)
                .unwrap_or_else(|| DEFAULT_RECOMMENDATION.into()),
            source: non_blank(self.source).unwrap_or_else(|| DEFAULT_SOURCE.into()),
        }
    }
}

/// Status change request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrderUpdate {
    pub order_id: Option<Uuid>,
    pub status: Option<PendingOrderStatus>,
}

/// Listing filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingOrderQuery {
    pub status: Option<PendingOrderStatus>,
}

impl PendingOrderQuery {
    pub fn matches(&self, order: &PendingOrder) -> bool {
        self.status.is_none_or(|s| order.status == s)
    }
}
