//! Service-layer error type
//!
//! `ServiceError` carries the workflow failures callers must be able to tell
//! apart and converts into `AppError` so handlers can use `?`.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};
use uuid::Uuid;

use crate::db::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Request failed validation; nothing was written
    #[error("invalid order: {0}")]
    InvalidOrder(String),
    /// Every generated order/tracking number pair collided
    #[error("order number collided on all {attempts} attempts")]
    DuplicateOrderNumber { attempts: u32 },
    #[error("no vehicle available for dispatch")]
    NoVehicleAvailable,
    /// Order row exists without its shipment and compensation failed
    #[error("order {order_id} was saved without its shipment")]
    PartialWriteFailure { order_id: Uuid },
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Business-rule error that already has its final code
    #[error("{0}")]
    App(AppError),
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::InvalidOrder(msg) => AppError::with_message(ErrorCode::InvalidOrder, msg),
            ServiceError::DuplicateOrderNumber { attempts } => {
                AppError::new(ErrorCode::DuplicateOrderNumber).with_detail("attempts", attempts)
            }
            ServiceError::NoVehicleAvailable => AppError::new(ErrorCode::NoVehicleAvailable),
            ServiceError::PartialWriteFailure { order_id }
            | ServiceError::Store(StoreError::PartialWrite { order_id }) => {
                tracing::error!(%order_id, "Order persisted without shipment");
                AppError::new(ErrorCode::PartialWriteFailure)
                    .with_detail("orderId", order_id.to_string())
            }
            ServiceError::Store(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, "Store unavailable");
                AppError::new(ErrorCode::StoreUnavailable)
            }
            ServiceError::Store(StoreError::Duplicate(what)) => {
                AppError::with_message(ErrorCode::AlreadyExists, format!("{what} already exists"))
            }
            ServiceError::Store(StoreError::Backend(err)) => {
                tracing::error!(error = %err, "Service database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_workflow_errors_map_to_distinct_codes() {
        let invalid: AppError = ServiceError::InvalidOrder("Items are required".into()).into();
        assert_eq!(invalid.code, ErrorCode::InvalidOrder);
        assert_eq!(invalid.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message, "Items are required");

        let dup: AppError = ServiceError::DuplicateOrderNumber { attempts: 3 }.into();
        assert_eq!(dup.http_status(), StatusCode::CONFLICT);

        let partial: AppError = ServiceError::PartialWriteFailure {
            order_id: Uuid::nil(),
        }
        .into();
        assert_eq!(partial.code, ErrorCode::PartialWriteFailure);
        assert!(partial.details.unwrap().contains_key("orderId"));
    }

    #[test]
    fn test_store_errors() {
        let unavailable: AppError =
            ServiceError::from(StoreError::Unavailable("timeout".into())).into();
        assert_eq!(unavailable.http_status(), StatusCode::SERVICE_UNAVAILABLE);

        let backend: AppError = ServiceError::from(StoreError::Backend("boom".into())).into();
        assert_eq!(backend.code, ErrorCode::DatabaseError);
    }
}
