//! Demand forecasting and event anomaly analysis

pub mod anomaly;
pub mod forecast;

pub use anomaly::analyze_events;
pub use forecast::{BaselineForecaster, ForecastService, Forecaster, RemoteForecaster};
