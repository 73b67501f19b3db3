//! Fleet API Handlers

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query, State};
use http::StatusCode;
use shared::error::{ApiResponse, AppResult};
use shared::models::{Vehicle, VehicleCreate, VehicleQuery};

use crate::api::{body, query};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<VehicleQuery>, QueryRejection>,
) -> AppResult<ApiResponse<Vec<Vehicle>>> {
    let params = query(params)?;
    let (vehicles, source) = state.fleet.list(params.status).await?;
    Ok(ApiResponse::from_source(vehicles, source))
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<VehicleCreate>, JsonRejection>,
) -> AppResult<(StatusCode, ApiResponse<Vehicle>)> {
    let vehicle = state.fleet.register(body(payload)?).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(vehicle)))
}
