//! Statement generation errors.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during statement generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatementError {
    /// Period start is after period end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}

impl StatementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
        }
    }
}
