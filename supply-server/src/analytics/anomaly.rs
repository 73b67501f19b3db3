//! Rule-based event anomaly detection
//!
//! Each event is `{type, message}` with `type` one of `Normal`,
//! `Suspicious` or `Anomalous`. Suspicious events are bucketed by keyword;
//! pattern rules then look across the whole batch.

use serde_json::Value;
use shared::models::{Anomaly, AnomalyReport, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Normal,
    Suspicious,
    Anomalous,
}

impl EventKind {
    fn parse(s: &str) -> Self {
        match s {
            "Suspicious" => Self::Suspicious,
            "Anomalous" => Self::Anomalous,
            _ => Self::Normal,
        }
    }
}

#[derive(Debug, Clone)]
struct Event {
    kind: EventKind,
    message: String,
}

impl From<Value> for Event {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Event {
                kind: map
                    .get("type")
                    .and_then(Value::as_str)
                    .map(EventKind::parse)
                    .unwrap_or(EventKind::Normal),
                message: match map.get("message") {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => serde_json::to_string(&map).unwrap_or_default(),
                },
            },
            Value::String(s) => Event {
                kind: EventKind::Normal,
                message: s,
            },
            other => Event {
                kind: EventKind::Normal,
                message: other.to_string(),
            },
        }
    }
}

/// Text that is not JSON becomes a single normal event.
fn parse_stream(stream: &str) -> Vec<Event> {
    match serde_json::from_str::<Value>(stream) {
        Ok(Value::Array(items)) => items.into_iter().map(Event::from).collect(),
        Ok(single) => vec![Event::from(single)],
        Err(_) => vec![Event {
            kind: EventKind::Normal,
            message: stream.to_string(),
        }],
    }
}

fn anomaly(summary: String, action: &str, severity: Severity, category: &str) -> Anomaly {
    Anomaly {
        summary,
        suggested_action: action.to_string(),
        severity,
        category: category.to_string(),
    }
}

struct KeywordRule {
    keywords: &'static [&'static str],
    prefix: &'static str,
    action: &'static str,
    severity: Severity,
    category: &'static str,
}

/// First match wins
const SUSPICIOUS_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["delivery", "delay", "late", "route", "driver"],
        prefix: "Delivery issue detected",
        action: "Review delivery route and contact driver. Check for traffic or weather issues. Consider route optimization.",
        severity: Severity::Medium,
        category: "delivery_issue",
    },
    KeywordRule {
        keywords: &["inventory", "stock", "warehouse", "quantity", "shortage"],
        prefix: "Inventory concern",
        action: "Verify stock levels and check for discrepancies. May need physical count. Consider reorder.",
        severity: Severity::Medium,
        category: "inventory_issue",
    },
    KeywordRule {
        keywords: &["order", "payment", "customer", "cancel"],
        prefix: "Order processing issue",
        action: "Review order details and customer communication. Check payment status and order history.",
        severity: Severity::Medium,
        category: "order_issue",
    },
    KeywordRule {
        keywords: &["login", "access", "unauthorized", "security", "failed"],
        prefix: "Security concern",
        action: "Review access logs and verify user credentials. Consider temporary access restriction.",
        severity: Severity::High,
        category: "security_issue",
    },
    KeywordRule {
        keywords: &["slow", "timeout", "performance", "latency", "error"],
        prefix: "Performance issue",
        action: "Monitor system resources and check for bottlenecks. Review recent deployments.",
        severity: Severity::Medium,
        category: "performance_issue",
    },
];

fn categorize_suspicious(message: &str) -> Anomaly {
    let lower = message.to_lowercase();
    SUSPICIOUS_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| {
            anomaly(
                format!("{}: {message}", rule.prefix),
                rule.action,
                rule.severity,
                rule.category,
            )
        })
        .unwrap_or_else(|| {
            anomaly(
                message.to_string(),
                "Monitor situation and investigate if pattern continues.",
                Severity::Low,
                "general",
            )
        })
}

fn detect_patterns(events: &[Event]) -> Vec<Anomaly> {
    let mut found = Vec::new();
    let count = |kind: EventKind| events.iter().filter(|e| e.kind == kind).count();

    let suspicious = count(EventKind::Suspicious);
    if suspicious >= 3 {
        found.push(anomaly(
            format!("Pattern detected: {suspicious} suspicious events in recent activity"),
            "Review system health and recent changes. Consider security audit. Check for coordinated issues.",
            Severity::Medium,
            "pattern_detection",
        ));
    }

    let anomalous = count(EventKind::Anomalous);
    if anomalous >= 2 {
        found.push(anomaly(
            format!("Critical: {anomalous} anomalous events detected"),
            "Escalate to operations team immediately. May indicate system-wide issue.",
            Severity::High,
            "critical_pattern",
        ));
    }

    // Only the first repeated message (in stream order) is reported
    let repeated = events.iter().find_map(|e| {
        if e.message.is_empty() {
            return None;
        }
        let n = events.iter().filter(|o| o.message == e.message).count();
        (n >= 3).then_some((e.message.as_str(), n))
    });
    if let Some((message, n)) = repeated {
        let preview: String = message.chars().take(50).collect();
        found.push(anomaly(
            format!("Repeated event detected: '{preview}...' occurred {n} times"),
            "Check for event loop or duplicate event generation. May indicate configuration issue.",
            Severity::Low,
            "repetition_pattern",
        ));
    }

    found
}

pub fn analyze_events(stream: &str) -> AnomalyReport {
    let events = parse_stream(stream);
    let mut anomalies: Vec<Anomaly> = events
        .iter()
        .filter_map(|event| match event.kind {
            EventKind::Anomalous => Some(anomaly(
                format!("Critical anomaly detected: {}", event.message),
                "Immediate investigation required. Check system logs and notify operations team.",
                Severity::High,
                "system_anomaly",
            )),
            EventKind::Suspicious => Some(categorize_suspicious(&event.message)),
            EventKind::Normal => None,
        })
        .collect();
    anomalies.extend(detect_patterns(&events));

    tracing::debug!(events = events.len(), anomalies = anomalies.len(), "Event stream analyzed");
    AnomalyReport {
        anomalies,
        events_analyzed: events.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(report: &AnomalyReport) -> Vec<&str> {
        report.anomalies.iter().map(|a| a.category.as_str()).collect()
    }

    #[test]
    fn test_free_text_is_one_normal_event() {
        let report = analyze_events("all quiet on the loading dock");
        assert_eq!(report.events_analyzed, 1);
        assert!(report.anomalies.is_empty());
    }

    #[test]
    fn test_suspicious_keyword_buckets() {
        let stream = r#"[
            {"type":"Suspicious","message":"Driver 12 running late"},
            {"type":"Suspicious","message":"Stock shortage in bay 3"},
            {"type":"Suspicious","message":"Repeated failed login for admin"},
            {"type":"Suspicious","message":"Something odd"}
        ]"#;
        let report = analyze_events(stream);
        assert_eq!(
            categories(&report),
            vec![
                "delivery_issue",
                "inventory_issue",
                "security_issue",
                "general",
                "pattern_detection"
            ]
        );
        assert_eq!(report.anomalies[2].severity, Severity::High);
    }

    #[test]
    fn test_anomalous_events_and_critical_pattern() {
        let stream = r#"[
            {"type":"Anomalous","message":"Temperature spike in cold room"},
            {"type":"Normal","message":"ok"},
            {"type":"Anomalous","message":"Scanner offline"}
        ]"#;
        let report = analyze_events(stream);
        assert_eq!(
            categories(&report),
            vec!["system_anomaly", "system_anomaly", "critical_pattern"]
        );
        assert!(report.anomalies[0].summary.contains("Temperature spike"));
    }

    #[test]
    fn test_repetition_reported_once() {
        let stream = r#"[
            {"type":"Normal","message":"heartbeat"},
            {"type":"Normal","message":"ping"},
            {"type":"Normal","message":"heartbeat"},
            {"type":"Normal","message":"ping"},
            {"type":"Normal","message":"heartbeat"},
            {"type":"Normal","message":"ping"}
        ]"#;
        let report = analyze_events(stream);
        assert_eq!(categories(&report), vec!["repetition_pattern"]);
        assert!(report.anomalies[0].summary.contains("'heartbeat...'"));
        assert!(report.anomalies[0].summary.contains("3 times"));
    }

    #[test]
    fn test_single_object_and_unknown_type() {
        let report = analyze_events(r#"{"type":"Weird","message":"x"}"#);
        assert_eq!(report.events_analyzed, 1);
        assert!(report.anomalies.is_empty());
    }
}
