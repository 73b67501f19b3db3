//! External predictive service client

use std::time::Duration;

use async_trait::async_trait;
use shared::models::{ForecastRequest, ForecastResult};

use super::{ForecastUnavailable, Forecaster};

pub struct RemoteForecaster {
    client: reqwest::Client,
    url: String,
}

impl RemoteForecaster {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Forecaster for RemoteForecaster {
    async fn predict(&self, request: &ForecastRequest) -> Result<ForecastResult, ForecastUnavailable> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ForecastUnavailable(e.to_string()))?;
        let result: ForecastResult = response
            .json()
            .await
            .map_err(|e| ForecastUnavailable(format!("malformed response: {e}")))?;

        let expected = request.forecast_horizon as usize;
        if result.forecasted_demand.len() != expected || result.confidence_intervals.len() != expected {
            return Err(ForecastUnavailable(format!(
                "expected {expected} periods, got {}",
                result.forecasted_demand.len()
            )));
        }
        Ok(result)
    }
}
