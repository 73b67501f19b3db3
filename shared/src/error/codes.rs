//! Unified error codes for the supply chain services
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Order errors
//! - 41xx: Shipment errors
//! - 42xx: Fleet errors
//! - 43xx: Notification errors
//! - 44xx: Pending order errors
//! - 5xxx: Forecast / analysis errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the frontend can switch
/// on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4007,
    /// Order payload failed validation
    InvalidOrder = 4008,
    /// Order/tracking number collided on every attempt
    DuplicateOrderNumber = 4009,
    /// Order status change not allowed by the state machine
    InvalidOrderTransition = 4010,
    /// Update request carried no fields
    NothingToUpdate = 4011,

    // ==================== 41xx: Shipment ====================
    /// Shipment not found
    ShipmentNotFound = 4101,
    /// Shipment status change not allowed by the state machine
    InvalidShipmentTransition = 4102,

    // ==================== 42xx: Fleet ====================
    /// No vehicle with status `available`
    NoVehicleAvailable = 4201,
    /// Vehicle not found
    VehicleNotFound = 4202,
    /// Vehicle id or number already registered
    VehicleAlreadyExists = 4203,

    // ==================== 43xx: Notification ====================
    /// Notification not found
    NotificationNotFound = 4301,

    // ==================== 44xx: Pending order ====================
    /// Pending order not found
    PendingOrderNotFound = 4401,

    // ==================== 5xxx: Forecast / analysis ====================
    /// Forecast request failed validation
    InvalidForecastRequest = 5001,
    /// Event stream could not be analyzed
    AnalysisFailed = 5101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Store unreachable or timed out
    StoreUnavailable = 9003,
    /// Request timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Order row committed without its shipment
    PartialWriteFailure = 9006,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::InvalidOrder => "Invalid order",
            ErrorCode::DuplicateOrderNumber => "Order number already exists",
            ErrorCode::InvalidOrderTransition => "Order status transition not allowed",
            ErrorCode::NothingToUpdate => "No fields to update",

            // Shipment
            ErrorCode::ShipmentNotFound => "Shipment not found",
            ErrorCode::InvalidShipmentTransition => "Shipment status transition not allowed",

            // Fleet
            ErrorCode::NoVehicleAvailable => "No vehicle available for dispatch",
            ErrorCode::VehicleNotFound => "Vehicle not found",
            ErrorCode::VehicleAlreadyExists => "Vehicle already exists",

            // Notification
            ErrorCode::NotificationNotFound => "Notification not found",

            // Pending order
            ErrorCode::PendingOrderNotFound => "Pending order not found",

            // Forecast / analysis
            ErrorCode::InvalidForecastRequest => "Invalid forecast request",
            ErrorCode::AnalysisFailed => "Event analysis failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::StoreUnavailable => "Data store is unavailable",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::PartialWriteFailure => "Order was saved without its shipment",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::InvalidOrder),
            4009 => Ok(ErrorCode::DuplicateOrderNumber),
            4010 => Ok(ErrorCode::InvalidOrderTransition),
            4011 => Ok(ErrorCode::NothingToUpdate),

            // Shipment
            4101 => Ok(ErrorCode::ShipmentNotFound),
            4102 => Ok(ErrorCode::InvalidShipmentTransition),

            // Fleet
            4201 => Ok(ErrorCode::NoVehicleAvailable),
            4202 => Ok(ErrorCode::VehicleNotFound),
            4203 => Ok(ErrorCode::VehicleAlreadyExists),

            // Notification
            4301 => Ok(ErrorCode::NotificationNotFound),

            // Pending order
            4401 => Ok(ErrorCode::PendingOrderNotFound),

            // Forecast / analysis
            5001 => Ok(ErrorCode::InvalidForecastRequest),
            5101 => Ok(ErrorCode::AnalysisFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::StoreUnavailable),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::PartialWriteFailure),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::DuplicateOrderNumber.code(), 4009);
        assert_eq!(ErrorCode::ShipmentNotFound.code(), 4101);
        assert_eq!(ErrorCode::NoVehicleAvailable.code(), 4201);
        assert_eq!(ErrorCode::NotificationNotFound.code(), 4301);
        assert_eq!(ErrorCode::PendingOrderNotFound.code(), 4401);
        assert_eq!(ErrorCode::PartialWriteFailure.code(), 9006);
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let all = [
            ErrorCode::Success,
            ErrorCode::Unknown,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::AlreadyExists,
            ErrorCode::InvalidRequest,
            ErrorCode::RequiredField,
            ErrorCode::ValueOutOfRange,
            ErrorCode::NotAuthenticated,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::OrderNotFound,
            ErrorCode::OrderEmpty,
            ErrorCode::InvalidOrder,
            ErrorCode::DuplicateOrderNumber,
            ErrorCode::InvalidOrderTransition,
            ErrorCode::NothingToUpdate,
            ErrorCode::ShipmentNotFound,
            ErrorCode::InvalidShipmentTransition,
            ErrorCode::NoVehicleAvailable,
            ErrorCode::VehicleNotFound,
            ErrorCode::VehicleAlreadyExists,
            ErrorCode::NotificationNotFound,
            ErrorCode::PendingOrderNotFound,
            ErrorCode::InvalidForecastRequest,
            ErrorCode::AnalysisFailed,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
            ErrorCode::StoreUnavailable,
            ErrorCode::TimeoutError,
            ErrorCode::ConfigError,
            ErrorCode::PartialWriteFailure,
        ];
        for code in all {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::DuplicateOrderNumber).unwrap();
        assert_eq!(json, "4009");
        let code: ErrorCode = serde_json::from_str("4201").unwrap();
        assert_eq!(code, ErrorCode::NoVehicleAvailable);
        assert!(serde_json::from_str::<ErrorCode>("4999").is_err());
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
