//! Business services over the store
//!
//! Reads degrade to demo data when the store is unreachable. Writes surface
//! `StoreUnavailable` unless the service keeps its own in-memory fallback.

pub mod notifications;
pub mod orders;
pub mod pending_orders;
pub mod shipments;

pub use notifications::NotificationLog;
pub use orders::OrderService;
pub use pending_orders::PendingOrderQueue;
pub use shipments::ShipmentService;
