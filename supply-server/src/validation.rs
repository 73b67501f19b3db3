//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use shared::error::AppError;

/// Product, customer, driver and location names
pub const MAX_NAME_LEN: usize = 200;

/// Notes and notification messages
pub const MAX_NOTE_LEN: usize = 500;

/// Vehicle numbers, ids, delivery types
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Shipping addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Rajesh", "driverName", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "driverName", MAX_NAME_LEN).is_err());
        let long = "x".repeat(MAX_SHORT_TEXT_LEN + 1);
        let err = validate_required_text(&long, "vehicleNumber", MAX_SHORT_TEXT_LEN).unwrap_err();
        assert!(err.message.contains("too long"));
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "notes", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(MAX_NOTE_LEN + 1)), "notes", MAX_NOTE_LEN).is_err());
    }
}
