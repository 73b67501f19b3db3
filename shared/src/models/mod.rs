//! Data models
//!
//! Shared between the dispatch service and its HTTP clients. All wire
//! payloads are camelCase JSON. Database row types live next to the
//! queries in the service crate and convert into these.

pub mod anomaly;
pub mod forecast;
pub mod geo;
pub mod notification;
pub mod order;
pub mod pending_order;
pub mod shipment;
pub mod vehicle;

// Re-exports
pub use anomaly::*;
pub use forecast::*;
pub use geo::*;
pub use notification::*;
pub use order::*;
pub use pending_order::*;
pub use shipment::*;
pub use vehicle::*;

use serde::{Deserialize, Serialize};

/// Where a response payload was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Durable relational storage
    Database,
    /// Process-local demo data, lost on restart
    Demo,
}

impl DataSource {
    pub fn is_demo(&self) -> bool {
        matches!(self, Self::Demo)
    }
}

/// Error returned when a status string does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} status: {value}")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub value: String,
}
