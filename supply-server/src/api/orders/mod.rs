//! Order API
//!
//! `POST /orders/place` requires both endpoints; `POST /orders` falls back to
//! the default corridor when they are missing.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/orders", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/place", post(handler::place))
        .route(
            "/{id}",
            get(handler::get_by_key)
                .put(handler::update)
                .delete(handler::delete),
        )
}
