//! Running balance chain math.
//!
//! Every general ledger row carries the account's balance immediately after
//! that row, in the account's normal-balance direction. Each new row chains
//! off the previous one: `current[N] = current[N-1] + change`. The account
//! additionally caches the chain tip as its current balance; the cache and
//! the chain must always agree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::PostingError;

/// Running balance for one ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Balance before this row.
    pub previous_balance: Decimal,
    /// Balance after this row.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Starts a chain for an account with no prior ledger rows.
    #[must_use]
    pub fn first_entry(balance_change: Decimal) -> Self {
        Self {
            previous_balance: Decimal::ZERO,
            current_balance: balance_change,
        }
    }

    /// Extends the chain from a known prior balance.
    #[must_use]
    pub fn from_prior(prior_balance: Decimal, balance_change: Decimal) -> Self {
        Self {
            previous_balance: prior_balance,
            current_balance: prior_balance + balance_change,
        }
    }

    /// Chains a new row off the previous one.
    #[must_use]
    pub fn next_entry(previous: &Self, balance_change: Decimal) -> Self {
        Self::from_prior(previous.current_balance, balance_change)
    }
}

/// Verifies the cached account balance against the ledger's chain tip.
///
/// `latest_running` is the running balance of the account's most recent
/// ledger row, or `None` when the account has no rows (in which case the
/// cache must be zero).
///
/// # Errors
///
/// Returns [`PostingError::BalanceMismatch`] when the cache and the chain
/// disagree. Callers must treat this as fatal and roll back.
pub fn check_balance_integrity(
    account_id: Uuid,
    cached: Decimal,
    latest_running: Option<Decimal>,
) -> Result<(), PostingError> {
    let expected = latest_running.unwrap_or(Decimal::ZERO);
    if cached == expected {
        Ok(())
    } else {
        Err(PostingError::BalanceMismatch {
            account_id,
            cached,
            expected,
        })
    }
}
