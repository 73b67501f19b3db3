//! Demand forecasting
//!
//! [`ForecastService`] asks the remote predictive service first when one is
//! configured and falls back to the closed-form [`BaselineForecaster`].

mod baseline;
mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use shared::error::{AppError, ErrorCode};
use shared::models::{ForecastRequest, ForecastResult, ForecastSource};

pub use baseline::BaselineForecaster;
pub use remote::RemoteForecaster;

use crate::error::ServiceResult;
use crate::validation::{MAX_NAME_LEN, validate_required_text};

pub const MAX_HORIZON: u32 = 60;
/// One hundred years of monthly history
pub const MAX_HISTORICAL_MONTHS: u32 = 1200;

#[derive(Debug, thiserror::Error)]
#[error("forecaster unavailable: {0}")]
pub struct ForecastUnavailable(pub String);

#[async_trait]
pub trait Forecaster: Send + Sync {
    async fn predict(&self, request: &ForecastRequest) -> Result<ForecastResult, ForecastUnavailable>;
}

fn invalid(msg: &str) -> AppError {
    AppError::with_message(ErrorCode::InvalidForecastRequest, msg)
}

pub fn validate_request(request: &ForecastRequest) -> Result<(), AppError> {
    validate_required_text(&request.product_name, "productName", MAX_NAME_LEN)
        .map_err(|e| invalid(&e.message))?;
    if !(1..=MAX_HISTORICAL_MONTHS).contains(&request.historical_months) {
        return Err(invalid("historicalMonths must be between 1 and 1200"));
    }
    if !(1..=MAX_HORIZON).contains(&request.forecast_horizon) {
        return Err(invalid("forecastHorizon must be between 1 and 60"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ForecastService {
    remote: Option<Arc<dyn Forecaster>>,
    baseline: Arc<dyn Forecaster>,
}

impl ForecastService {
    pub fn new(remote: Option<Arc<dyn Forecaster>>, baseline: Arc<dyn Forecaster>) -> Self {
        Self { remote, baseline }
    }

    pub async fn forecast(&self, request: ForecastRequest) -> ServiceResult<ForecastResult> {
        validate_request(&request)?;

        if let Some(remote) = &self.remote {
            match remote.predict(&request).await {
                Ok(mut result) => {
                    result.source = ForecastSource::Remote;
                    return Ok(result);
                }
                Err(e) => {
                    tracing::warn!(product = %request.product_name, error = %e, "Remote forecast failed, using baseline");
                }
            }
        }

        let mut result = self.baseline.predict(&request).await.map_err(|e| {
            AppError::with_message(ErrorCode::AnalysisFailed, e.to_string())
        })?;
        result.source = ForecastSource::Baseline;
        Ok(result)
    }
}
