//! supply-server: order placement and shipment dispatch
//!
//! Places orders against the fleet, synthesizes routes, tracks shipments
//! and keeps a per-user notification log. Persistence is PostgreSQL when
//! `DATABASE_URL` is set and an in-memory store otherwise.

pub mod analytics;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod logger;
pub mod services;
pub mod state;
pub mod validation;

pub use config::Config;
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
