//! Event anomaly API

use axum::extract::Json;
use axum::extract::rejection::JsonRejection;
use axum::{Router, routing::post};
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{AnalyzeEventsRequest, AnomalyReport};

use crate::analytics::analyze_events;
use crate::api::body;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/events/analyze", post(analyze))
}

async fn analyze(
    payload: Result<Json<AnalyzeEventsRequest>, JsonRejection>,
) -> AppResult<ApiResponse<AnomalyReport>> {
    let request = body(payload)?;
    if request.event_stream.trim().is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, "Event stream cannot be empty.")
                .with_detail("field", "eventStream"),
        );
    }
    Ok(ApiResponse::success(analyze_events(&request.event_stream)))
}
