//! Ledger posting errors.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by general ledger posting rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostingError {
    /// The entry has no lines to post.
    #[error("Journal entry {0} has no lines to post")]
    NoLines(Uuid),

    /// The cached account balance disagrees with the ledger's running
    /// balance. A mismatch means an invariant was violated somewhere and
    /// is always fatal.
    #[error(
        "Account {account_id} balance mismatch: cached {cached}, ledger says {expected}"
    )]
    BalanceMismatch {
        /// The account whose balance drifted.
        account_id: Uuid,
        /// The cached balance stored on the account.
        cached: Decimal,
        /// The running balance derived from the ledger rows.
        expected: Decimal,
    },
}

impl PostingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoLines(_) => "NO_LINES",
            Self::BalanceMismatch { .. } => "BALANCE_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_mismatch_display() {
        let err = PostingError::BalanceMismatch {
            account_id: Uuid::nil(),
            cached: dec!(100.00),
            expected: dec!(90.00),
        };
        assert_eq!(
            err.to_string(),
            "Account 00000000-0000-0000-0000-000000000000 balance mismatch: \
             cached 100.00, ledger says 90.00"
        );
        assert_eq!(err.error_code(), "BALANCE_MISMATCH");
    }
}
