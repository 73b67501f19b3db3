//! Demand forecast payloads

use serde::{Deserialize, Serialize};

/// Forecast request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    pub product_name: String,
    /// Months of sales history the caller has on record
    #[serde(alias = "historicalDataRange")]
    pub historical_months: u32,
    /// Number of monthly periods to forecast
    pub forecast_horizon: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandTrend {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceInterval {
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Which forecaster produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastSource {
    /// External predictive service
    Remote,
    /// Closed-form local estimate
    #[default]
    Baseline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub forecasted_demand: Vec<f64>,
    pub model_accuracy: f64,
    pub confidence_intervals: Vec<ConfidenceInterval>,
    pub trend: DemandTrend,
    #[serde(default)]
    pub seasonality: bool,
    #[serde(default)]
    pub insights: Vec<String>,
    /// Set by the service, not by remote forecasters
    #[serde(default)]
    pub source: ForecastSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_range_alias() {
        let req: ForecastRequest = serde_json::from_str(
            r#"{"productName":"Monitors","historicalDataRange":24,"forecastHorizon":6}"#,
        )
        .unwrap();
        assert_eq!(req.historical_months, 24);
    }

    #[test]
    fn test_remote_result_without_source() {
        let result: ForecastResult = serde_json::from_str(
            r#"{"forecastedDemand":[10.0],"modelAccuracy":0.9,
                "confidenceIntervals":[{"lowerBound":8.0,"upperBound":12.0}],"trend":"stable"}"#,
        )
        .unwrap();
        assert_eq!(result.source, ForecastSource::Baseline);
        assert!(!result.seasonality);
    }
}
