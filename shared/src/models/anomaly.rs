//! Event stream anomaly payloads

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub summary: String,
    pub suggested_action: String,
    pub severity: Severity,
    /// Rule that fired, e.g. `system_anomaly` or `repetition_pattern`
    pub category: String,
}

/// Analyze request body; `eventStream` is a JSON array of `{type, message}`
/// or free text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeEventsRequest {
    #[serde(default)]
    pub event_stream: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyReport {
    pub anomalies: Vec<Anomaly>,
    pub events_analyzed: usize,
}
