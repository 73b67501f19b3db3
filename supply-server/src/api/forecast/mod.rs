//! Demand forecast API

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::{Router, routing::post};
use shared::error::{ApiResponse, AppResult};
use shared::models::{ForecastRequest, ForecastResult};

use crate::api::body;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/forecast", post(forecast))
}

async fn forecast(
    State(state): State<AppState>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> AppResult<ApiResponse<ForecastResult>> {
    let result = state.forecaster.forecast(body(payload)?).await?;
    Ok(ApiResponse::success(result))
}
