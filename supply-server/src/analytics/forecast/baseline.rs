//! Closed-form demand estimate
//!
//! `value(k) = baseline · (1 + 0.02k) · (1 + 0.2·sin(2π·m/12)) · (1 + ε)`
//! with `m = historicalMonths + k` and `ε` uniform in ±5%.

use std::f64::consts::PI;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::models::{ConfidenceInterval, DemandTrend, ForecastRequest, ForecastResult, ForecastSource};

use super::{ForecastUnavailable, Forecaster};

const DEFAULT_BASELINE: f64 = 150.0;
const TREND_PER_PERIOD: f64 = 0.02;
const SEASONAL_AMPLITUDE: f64 = 0.2;
const NOISE: f64 = 0.05;
const CI_LOWER: f64 = 0.75;
const CI_UPPER: f64 = 1.25;
const MODEL_ACCURACY: f64 = 0.70;
/// Slope threshold as a share of the mean
const TREND_THRESHOLD: f64 = 0.05;
const SEASONALITY_MIN_MONTHS: u32 = 24;

fn baseline_for(product: &str) -> f64 {
    match product.trim() {
        "Monitors" => 100.0,
        "Keyboards" => 300.0,
        _ => DEFAULT_BASELINE,
    }
}

/// Value for period `k` before noise
pub(crate) fn expected_value(product: &str, historical_months: u32, k: u32) -> f64 {
    let m = f64::from(historical_months) + f64::from(k);
    let trend = 1.0 + TREND_PER_PERIOD * f64::from(k);
    let seasonal = 1.0 + SEASONAL_AMPLITUDE * (2.0 * PI * m / 12.0).sin();
    baseline_for(product) * trend * seasonal
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Least-squares slope compared against 5% of the mean
fn classify_trend(values: &[f64]) -> DemandTrend {
    if values.len() < 2 {
        return DemandTrend::Stable;
    }
    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;
    if mean_y == 0.0 {
        return DemandTrend::Stable;
    }
    let (mut num, mut den) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        num += dx * (y - mean_y);
        den += dx * dx;
    }
    let slope = num / den;
    let threshold = mean_y * TREND_THRESHOLD;
    if slope > threshold {
        DemandTrend::Increasing
    } else if slope < -threshold {
        DemandTrend::Decreasing
    } else {
        DemandTrend::Stable
    }
}

fn insights(trend: DemandTrend, seasonality: bool, historical_months: u32) -> Vec<String> {
    let mut out = vec![
        match trend {
            DemandTrend::Increasing => "Demand is projected to increase over the forecast period.",
            DemandTrend::Decreasing => {
                "Demand is projected to decrease. Consider adjusting inventory levels."
            }
            DemandTrend::Stable => "Demand is expected to remain stable.",
        }
        .to_string(),
    ];
    if seasonality {
        out.push("Strong seasonal patterns detected. Plan inventory for peak periods.".into());
    }
    if historical_months < 12 {
        out.push("Limited historical data available for this product.".into());
    }
    out.push("Forecast based on baseline estimates.".into());
    out
}

pub struct BaselineForecaster {
    rng: Mutex<StdRng>,
}

impl BaselineForecaster {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible noise for tests
    pub fn with_rng_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn estimate(&self, request: &ForecastRequest) -> ForecastResult {
        let values: Vec<f64> = {
            let mut rng = self.rng.lock();
            (0..request.forecast_horizon)
                .map(|k| {
                    let noise: f64 = rng.gen_range(-NOISE..=NOISE);
                    round2(expected_value(&request.product_name, request.historical_months, k) * (1.0 + noise))
                })
                .collect()
        };
        let confidence_intervals = values
            .iter()
            .map(|v| ConfidenceInterval {
                lower_bound: round2(v * CI_LOWER),
                upper_bound: round2(v * CI_UPPER),
            })
            .collect();
        let trend = classify_trend(&values);
        let seasonality = request.historical_months >= SEASONALITY_MIN_MONTHS;

        ForecastResult {
            insights: insights(trend, seasonality, request.historical_months),
            forecasted_demand: values,
            model_accuracy: MODEL_ACCURACY,
            confidence_intervals,
            trend,
            seasonality,
            source: ForecastSource::Baseline,
        }
    }
}

impl Default for BaselineForecaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forecaster for BaselineForecaster {
    async fn predict(&self, request: &ForecastRequest) -> Result<ForecastResult, ForecastUnavailable> {
        Ok(self.estimate(request))
    }
}
