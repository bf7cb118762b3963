//! Account classification types.
//!
//! The account-type and normal-balance enums are the closed variant sets
//! every other module dispatches on. The type-to-normal-balance mapping is
//! defined once here and referenced everywhere a balance direction matters.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::AccountError;

/// Account classification in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources the organization owns.
    Asset,
    /// Obligations the organization owes.
    Liability,
    /// The owners' residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// All account types, in statement order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Returns the direction in which this account type conventionally grows.
    ///
    /// Asset and Expense accounts increase with debits; Liability, Equity,
    /// and Revenue accounts increase with credits.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns true if this type appears on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Returns true if this type appears on the income statement.
    #[must_use]
    pub const fn is_income_statement(self) -> bool {
        matches!(self, Self::Revenue | Self::Expense)
    }

    /// Returns the lowercase string form used in storage and APIs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            _ => Err(AccountError::UnknownAccountType(s.to_string())),
        }
    }
}

/// The direction in which an account's balance conventionally increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Balance grows with debits.
    Debit,
    /// Balance grows with credits.
    Credit,
}

impl NormalBalance {
    /// Calculates the signed balance change for a debit/credit pair.
    ///
    /// Debit-normal accounts grow by `debit - credit`; credit-normal
    /// accounts grow by `credit - debit`.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }

    /// Returns the lowercase string form used in storage and APIs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl fmt::Display for NormalBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalBalance {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            _ => Err(AccountError::UnknownNormalBalance(s.to_string())),
        }
    }
}

/// Validates that a caller-supplied normal balance matches the account type.
///
/// The normal balance is always derived from the type; a caller may still
/// pass one explicitly, in which case it must agree with the derivation.
///
/// # Errors
///
/// Returns [`AccountError::NormalBalanceMismatch`] if the supplied direction
/// contradicts the account type.
pub fn validate_normal_balance(
    account_type: AccountType,
    declared: Option<NormalBalance>,
) -> Result<NormalBalance, AccountError> {
    let expected = account_type.normal_balance();
    match declared {
        Some(actual) if actual != expected => Err(AccountError::NormalBalanceMismatch {
            account_type,
            expected,
            actual,
        }),
        _ => Ok(expected),
    }
}
