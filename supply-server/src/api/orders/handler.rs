//! Order API Handlers

use axum::Extension;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};
use http::StatusCode;
use shared::error::{ApiResponse, AppResult};
use shared::models::{Order, OrderDetail, OrderQuery, OrderUpdate, PlaceOrderRequest};

use crate::api::{body, query};
use crate::auth::Principal;
use crate::dispatch::{PlacementOutcome, PlacementPolicy};
use crate::state::AppState;

async fn submit(
    state: &AppState,
    principal: &Principal,
    request: PlaceOrderRequest,
    policy: PlacementPolicy,
) -> AppResult<(StatusCode, ApiResponse<PlacementOutcome>)> {
    let outcome = state
        .dispatcher
        .place_order(principal, request, policy)
        .await?;
    let source = outcome.source;
    Ok((StatusCode::CREATED, ApiResponse::from_source(outcome, source)))
}

/// Place an order with explicit origin and destination
pub async fn place(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> AppResult<(StatusCode, ApiResponse<PlacementOutcome>)> {
    submit(&state, &principal, body(payload)?, PlacementPolicy::Strict).await
}

/// Create an order, defaulting missing endpoints
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> AppResult<(StatusCode, ApiResponse<PlacementOutcome>)> {
    submit(&state, &principal, body(payload)?, PlacementPolicy::Lenient).await
}

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    params: Result<Query<OrderQuery>, QueryRejection>,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let params = query(params)?;
    let (orders, source) = state.orders.list(&principal.user_key, &params).await?;
    Ok(ApiResponse::from_source(orders, source))
}

pub async fn get_by_key(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(key): Path<String>,
) -> AppResult<ApiResponse<OrderDetail>> {
    let (detail, source) = state.orders.get(&principal.user_key, &key).await?;
    Ok(ApiResponse::from_source(detail, source))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(key): Path<String>,
    payload: Result<Json<OrderUpdate>, JsonRejection>,
) -> AppResult<ApiResponse<Order>> {
    let order = state
        .orders
        .update(&principal.user_key, &key, body(payload)?)
        .await?;
    Ok(ApiResponse::success(order))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(key): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let order = state.orders.delete(&principal.user_key, &key).await?;
    Ok(ApiResponse::success(order))
}
