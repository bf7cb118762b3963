//! General ledger posting logic.
//!
//! This module implements the math the ledger poster runs per account:
//! - Running balance chains
//! - Cached-balance integrity verification
//! - Error types for posting violations

pub mod balance;
pub mod error;

pub use balance::{check_balance_integrity, RunningBalance};
pub use error::PostingError;
