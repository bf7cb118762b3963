//! Financial statement generation.
//!
//! This module provides pure business logic for generating financial
//! statements:
//! - Trial Balance
//! - Balance Sheet
//! - Income Statement

pub mod classification;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use classification::{BalanceSheetGroup, IncomeStatementGroup, StatementClassification};
pub use error::StatementError;
pub use service::StatementService;
pub use types::*;
