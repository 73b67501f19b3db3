//! Fleet API

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/trucks", get(handler::list).post(handler::register))
}
