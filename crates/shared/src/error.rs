//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Every fallible ledger operation maps into one of these categories so
/// callers can distinguish recoverable rejections (validation, not-found,
/// conflict) from faults that require intervention (integrity, database).
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input: bad account code, unbalanced entry, invalid line.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist or is out of scope.
    #[error("Not found: {0}")]
    NotFound(String),

    /// State conflict: duplicate code/number, illegal state transition.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored invariant no longer holds. Always fatal, never swallowed.
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Integrity(_) => "INTEGRITY_VIOLATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller may retry the operation unchanged.
    ///
    /// Only transient storage failures qualify; validation, not-found,
    /// conflict, and integrity errors will fail identically on retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(
            AppError::Integrity(String::new()).error_code(),
            "INTEGRITY_VIOLATION"
        );
        assert_eq!(
            AppError::Database(String::new()).error_code(),
            "DATABASE_ERROR"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("unbalanced entry".into()).to_string(),
            "Validation error: unbalanced entry"
        );
        assert_eq!(
            AppError::NotFound("account 1100".into()).to_string(),
            "Not found: account 1100"
        );
        assert_eq!(
            AppError::Conflict("already posted".into()).to_string(),
            "Conflict: already posted"
        );
        assert_eq!(
            AppError::Integrity("balance drift".into()).to_string(),
            "Integrity violation: balance drift"
        );
    }

    #[test]
    fn test_only_database_errors_are_retryable() {
        assert!(AppError::Database(String::new()).is_retryable());
        assert!(!AppError::Validation(String::new()).is_retryable());
        assert!(!AppError::NotFound(String::new()).is_retryable());
        assert!(!AppError::Conflict(String::new()).is_retryable());
        assert!(!AppError::Integrity(String::new()).is_retryable());
        assert!(!AppError::Internal(String::new()).is_retryable());
    }
}
