//! Shipment API Handlers

use axum::Extension;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};
use shared::error::{ApiResponse, AppResult};
use shared::models::{Shipment, ShipmentQuery, ShipmentUpdate};

use crate::api::{body, query};
use crate::auth::Principal;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    params: Result<Query<ShipmentQuery>, QueryRejection>,
) -> AppResult<ApiResponse<Vec<Shipment>>> {
    let params = query(params)?;
    let (shipments, source) = state.shipments.list(&principal.user_key, &params).await?;
    Ok(ApiResponse::from_source(shipments, source))
}

pub async fn get_by_key(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(key): Path<String>,
) -> AppResult<ApiResponse<Shipment>> {
    let (shipment, source) = state.shipments.get(&principal.user_key, &key).await?;
    Ok(ApiResponse::from_source(shipment, source))
}

/// Tracking update; status changes move the owning order too
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(key): Path<String>,
    payload: Result<Json<ShipmentUpdate>, JsonRejection>,
) -> AppResult<ApiResponse<Shipment>> {
    let shipment = state
        .shipments
        .update(&principal.user_key, &key, body(payload)?)
        .await?;
    Ok(ApiResponse::success(shipment))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(key): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.shipments.delete(&principal.user_key, &key).await?;
    Ok(ApiResponse::ok())
}
