//! Journal entry rule errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by journal entry validation rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JournalError {
    /// Entry must have at least two lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Line amount cannot be zero.
    #[error("Line amount cannot be zero")]
    ZeroAmount,

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    /// Entry has only debit lines or only credit lines.
    #[error("Journal entry must have both debit and credit lines")]
    SingleSided,

    /// Debit and credit totals differ.
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Entry type string is not one of the known variants.
    #[error("Unknown journal entry type: {0}")]
    UnknownEntryType(String),
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::SingleSided => "SINGLE_SIDED",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::UnknownEntryType(_) => "UNKNOWN_ENTRY_TYPE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(JournalError::InsufficientLines.error_code(), "INSUFFICIENT_LINES");
        assert_eq!(JournalError::ZeroAmount.error_code(), "ZERO_AMOUNT");
        assert_eq!(
            JournalError::Unbalanced {
                debit: dec!(100),
                credit: dec!(50),
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
    }

    #[test]
    fn test_unbalanced_display() {
        let err = JournalError::Unbalanced {
            debit: dec!(100.00),
            credit: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debit: 100.00, Credit: 50.00"
        );
    }
}
