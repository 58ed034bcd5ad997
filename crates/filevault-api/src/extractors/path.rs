//! Typed path parameter helpers.

use filevault_core::error::AppError;
use filevault_core::types::LogicalId;

/// Parses a logical file id from a path segment.
pub fn parse_logical_id(s: &str) -> Result<LogicalId, AppError> {
    s.parse()
        .map_err(|_| AppError::validation(format!("Invalid file id: {s}")))
}

/// Parses a row id from a path segment.
pub fn parse_row_id(s: &str) -> Result<i64, AppError> {
    s.parse()
        .map_err(|_| AppError::validation(format!("Invalid row id: {s}")))
}

/// Parses a version number from a path segment.
pub fn parse_version(s: &str) -> Result<i32, AppError> {
    s.parse()
        .map_err(|_| AppError::validation(format!("Invalid version: {s}")))
}
