//! Chart-of-accounts domain logic.
//!
//! This module implements the account-side rules:
//! - Account types and their normal balance directions
//! - Account code format rules
//! - Parent/child hierarchy validation and cycle detection
//! - Error types for account rule violations

pub mod code;
pub mod error;
pub mod hierarchy;
pub mod types;

pub use code::{code_number, is_valid_code, validate_code, ACCOUNT_CODE_LEN};
pub use error::AccountError;
pub use hierarchy::{
    build_tree, validate_parent, would_create_cycle, AccountNode, AccountSummary, ParentAccount,
    ParentLink, MAX_HIERARCHY_DEPTH,
};
pub use types::{validate_normal_balance, AccountType, NormalBalance};
