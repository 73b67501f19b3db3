//! Notification API Handlers

use axum::Extension;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query, State};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{MarkReadRequest, Notification, NotificationCreate};
use uuid::Uuid;

use crate::api::{body, query};
use crate::auth::Principal;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResult {
    pub updated: u64,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<ApiResponse<Vec<Notification>>> {
    let params = query(params)?;
    let (rows, source) = state
        .notifications
        .list(&principal.user_key, params.unread)
        .await?;
    Ok(ApiResponse::from_source(rows, source))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<NotificationCreate>, JsonRejection>,
) -> AppResult<(StatusCode, ApiResponse<Notification>)> {
    let (notification, source) = state
        .notifications
        .create(&principal.user_key, body(payload)?)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::from_source(notification, source)))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<MarkReadRequest>, JsonRejection>,
) -> AppResult<ApiResponse<MarkReadResult>> {
    let (updated, source) = state
        .notifications
        .mark_read(&principal.user_key, body(payload)?)
        .await?;
    Ok(ApiResponse::from_source(MarkReadResult { updated }, source))
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
            AppError::with_message(ErrorCode::RequiredField, "Notification id is required")
                .with_detail("field", "id")
        })?;
    let id = Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::validation(format!("Invalid notification id: {raw}")))?;
    state.notifications.delete(&principal.user_key, id).await?;
    Ok(ApiResponse::ok())
}
