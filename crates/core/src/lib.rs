//! Core accounting logic for Folio.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `account` - Chart of accounts types, code rules, and hierarchy checks
//! - `journal` - Journal entry validation, numbering, and lifecycle
//! - `posting` - Ledger posting math and running balances
//! - `statements` - Trial balance and financial statement assembly

pub mod account;
pub mod journal;
pub mod posting;
pub mod statements;
