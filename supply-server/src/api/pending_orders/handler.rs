//! Pending-order API Handlers

use axum::Extension;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query, State};
use http::StatusCode;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{PendingOrder, PendingOrderInput, PendingOrderQuery, PendingOrderUpdate};
use uuid::Uuid;

use crate::api::{body, query};
use crate::auth::Principal;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    params: Result<Query<PendingOrderQuery>, QueryRejection>,
) -> AppResult<ApiResponse<Vec<PendingOrder>>> {
    let params = query(params)?;
    let (rows, source) = state
        .pending_orders
        .list(&principal.user_key, &params)
        .await?;
    Ok(ApiResponse::from_source(rows, source))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<PendingOrderInput>, JsonRejection>,
) -> AppResult<(StatusCode, ApiResponse<PendingOrder>)> {
    let (order, source) = state
        .pending_orders
        .create(&principal.user_key, body(payload)?)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::from_source(order, source)))
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<PendingOrderUpdate>, JsonRejection>,
) -> AppResult<ApiResponse<PendingOrder>> {
    let (order, source) = state
        .pending_orders
        .set_status(&principal.user_key, body(payload)?)
        .await?;
    Ok(ApiResponse::from_source(order, source))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    params: Result<Query<DeleteQuery>, QueryRejection>,
) -> AppResult<ApiResponse<()>> {
    let raw = query(params)?
        .id
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::RequiredField, "Pending order id is required")
                .with_detail("field", "id")
        })?;
    let id = Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::validation(format!("Invalid pending order id: {raw}")))?;
    state.pending_orders.delete(&principal.user_key, id).await?;
    Ok(ApiResponse::ok())
}
