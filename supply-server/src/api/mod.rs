//! HTTP routes
//!
//! - [`health`] - liveness and persistence mode
//! - [`orders`] - placement, listing, updates
//! - [`shipments`] - tracking updates with order cascade
//! - [`notifications`] - per-user notification log
//! - [`pending_orders`] - forecast-driven order queue
//! - [`trucks`] - fleet registry
//! - [`forecast`] - demand estimates
//! - [`events`] - event stream anomaly analysis

pub mod events;
pub mod forecast;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod pending_orders;
pub mod shipments;
pub mod trucks;

use std::time::Instant;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};
use axum::{Router, middleware};
use shared::error::AppError;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::state::AppState;

async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        target: "http_access",
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "{} {}",
        method,
        uri
    );
    response
}

/// Build the router with state, auth and the standard layers applied.
pub fn build_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(shipments::router())
        .merge(notifications::router())
        .merge(pending_orders::router())
        .merge(trucks::router())
        .merge(forecast::router())
        .merge(events::router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Unwrap a JSON body, rendering rejections in the unified error shape
pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| AppError::invalid_request(e.body_text()))
}

pub(crate) fn query<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    params
        .map(|Query(v)| v)
        .map_err(|e| AppError::invalid_request(e.body_text()))
}
