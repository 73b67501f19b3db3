//! Dispatch: fleet selection, route synthesis, identifiers and order placement

pub mod fleet;
pub mod ids;
pub mod route;
pub mod workflow;

pub use fleet::FleetRegistry;
pub use workflow::{Dispatcher, PlacementOutcome, PlacementPolicy};
