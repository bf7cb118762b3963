//! Account rule errors.

use thiserror::Error;
use uuid::Uuid;

use super::types::{AccountType, NormalBalance};

/// Errors raised by chart-of-accounts validation rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// Account code is not exactly four ASCII digits.
    #[error("Invalid account code '{0}': must be exactly 4 digits")]
    InvalidCode(String),

    /// Account type string is not one of the known variants.
    #[error("Unknown account type: {0}")]
    UnknownAccountType(String),

    /// Normal balance string is not one of the known variants.
    #[error("Unknown normal balance: {0}")]
    UnknownNormalBalance(String),

    /// Declared normal balance contradicts the account type.
    #[error("Account type {account_type} has normal balance {expected}, got {actual}")]
    NormalBalanceMismatch {
        /// The account type being created.
        account_type: AccountType,
        /// The normal balance derived from the type.
        expected: NormalBalance,
        /// The normal balance supplied by the caller.
        actual: NormalBalance,
    },

    /// Parent account has a different account type than the child.
    #[error("Parent account type mismatch: parent is {parent}, child is {child}")]
    ParentTypeMismatch {
        /// The parent's account type.
        parent: AccountType,
        /// The child's account type.
        child: AccountType,
    },

    /// Assigning the requested parent would create a cycle.
    #[error("Parent assignment would create a cycle for account {0}")]
    ParentCycle(Uuid),

    /// Ancestor chain exceeds the supported depth.
    #[error("Account hierarchy exceeds maximum depth for account {0}")]
    HierarchyTooDeep(Uuid),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCode(_) => "INVALID_ACCOUNT_CODE",
            Self::UnknownAccountType(_) => "UNKNOWN_ACCOUNT_TYPE",
            Self::UnknownNormalBalance(_) => "UNKNOWN_NORMAL_BALANCE",
            Self::NormalBalanceMismatch { .. } => "NORMAL_BALANCE_MISMATCH",
            Self::ParentTypeMismatch { .. } => "PARENT_TYPE_MISMATCH",
            Self::ParentCycle(_) => "PARENT_CYCLE",
            Self::HierarchyTooDeep(_) => "HIERARCHY_TOO_DEEP",
        }
    }
}
