//! Shared types for the supply chain services
//!
//! Domain models, status state machines, and the unified error and
//! response types used by the dispatch service and its clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
