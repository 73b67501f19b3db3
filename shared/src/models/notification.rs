//! Notification Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Order,
    Delivery,
    Alert,
    #[default]
    System,
}

impl NotificationType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Delivery => "delivery",
            Self::Alert => "alert",
            Self::System => "system",
        }
    }

    /// Unknown stored values read back as `system`
    pub fn from_db(s: &str) -> Self {
        match s {
            "order" => Self::Order,
            "delivery" => Self::Delivery,
            "alert" => Self::Alert,
            _ => Self::System,
        }
    }
}

/// Notification entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_key: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub order_id: Option<Uuid>,
    pub order_number: Option<String>,
    pub tracking_number: Option<String>,
    pub read: bool,
    /// Wire name kept as `timestamp` for existing dashboards
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Create notification payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCreate {
    #[serde(rename = "type", default)]
    pub kind: NotificationType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub order_id: Option<Uuid>,
    pub order_number: Option<String>,
    pub tracking_number: Option<String>,
}

/// Mark-read request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub notification_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub mark_all_read: bool,
}

/// Which notifications a mark-read call targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkRead {
    Ids(Vec<Uuid>),
    All,
}

impl MarkReadRequest {
    /// `None` when the request names nothing to mark
    pub fn target(self) -> Option<MarkRead> {
        if self.mark_all_read {
            return Some(MarkRead::All);
        }
        match self.notification_ids {
            Some(ids) if !ids.is_empty() => Some(MarkRead::Ids(ids)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_read_target() {
        let all: MarkReadRequest = serde_json::from_str(r#"{"markAllRead":true}"#).unwrap();
        assert_eq!(all.target(), Some(MarkRead::All));

        let none: MarkReadRequest = serde_json::from_str(r#"{"notificationIds":[]}"#).unwrap();
        assert_eq!(none.target(), None);

        let id = Uuid::new_v4();
        let some = MarkReadRequest {
            notification_ids: Some(vec![id]),
            mark_all_read: false,
        };
        assert_eq!(some.target(), Some(MarkRead::Ids(vec![id])));
    }

    #[test]
    fn test_create_defaults_to_system_type() {
        let create: NotificationCreate =
            serde_json::from_str(r#"{"title":"Hi","message":"there"}"#).unwrap();
        assert_eq!(create.kind, NotificationType::System);
    }

    #[test]
    fn test_unknown_stored_type_reads_as_system() {
        assert_eq!(NotificationType::from_db("promo"), NotificationType::System);
        assert_eq!(NotificationType::from_db("delivery"), NotificationType::Delivery);
    }
}
