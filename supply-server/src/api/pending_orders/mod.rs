//! Pending-order queue API

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/pending-orders",
        get(handler::list)
            .post(handler::create)
            .put(handler::update_status)
            .delete(handler::delete),
    )
}
