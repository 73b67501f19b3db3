//! Shipment API

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/shipments", routes())
}

fn routes() -> Router<AppState> {
    Router::new().route("/", get(handler::list)).route(
        "/{id}",
        get(handler::get_by_key)
            .put(handler::update)
            .delete(handler::delete),
    )
}
