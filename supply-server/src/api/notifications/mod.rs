//! Notification API

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/notifications",
        get(handler::list)
            .post(handler::create)
            .put(handler::mark_read)
            .delete(handler::delete),
    )
}
