//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Order errors (4000-4099)
    Order,
    /// Shipment errors (4100-4199)
    Shipment,
    /// Fleet errors (4200-4299)
    Fleet,
    /// Notification errors (4300-4399)
    Notification,
    /// Pending order errors (4400-4999)
    PendingOrder,
    /// Forecast and analysis errors (5xxx-8xxx)
    Analytics,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..4000 => Self::Auth,
            4000..4100 => Self::Order,
            4100..4200 => Self::Shipment,
            4200..4300 => Self::Fleet,
            4300..4400 => Self::Notification,
            4400..5000 => Self::PendingOrder,
            5000..9000 => Self::Analytics,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Order => "order",
            Self::Shipment => "shipment",
            Self::Fleet => "fleet",
            Self::Notification => "notification",
            Self::PendingOrder => "pending_order",
            Self::Analytics => "analytics",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Order);
        assert_eq!(ErrorCategory::from_code(4101), ErrorCategory::Shipment);
        assert_eq!(ErrorCategory::from_code(4201), ErrorCategory::Fleet);
        assert_eq!(ErrorCategory::from_code(4301), ErrorCategory::Notification);
        assert_eq!(ErrorCategory::from_code(4401), ErrorCategory::PendingOrder);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Analytics);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TokenInvalid.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::InvalidOrder.category(), ErrorCategory::Order);
        assert_eq!(
            ErrorCode::InvalidShipmentTransition.category(),
            ErrorCategory::Shipment
        );
        assert_eq!(ErrorCode::NoVehicleAvailable.category(), ErrorCategory::Fleet);
        assert_eq!(
            ErrorCode::NotificationNotFound.category(),
            ErrorCategory::Notification
        );
        assert_eq!(
            ErrorCode::PartialWriteFailure.category(),
            ErrorCategory::System
        );
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Fleet).unwrap();
        assert_eq!(json, "\"fleet\"");
        let category: ErrorCategory = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(category, ErrorCategory::System);
    }
}
