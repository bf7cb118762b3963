//! Journal entry domain logic.
//!
//! This module implements the journal side of double-entry bookkeeping:
//! - Entry and line input types
//! - Balance and line validation
//! - Sequence number generation (`JE-2026-0001` style)
//! - Reversal entry construction
//! - Lifecycle state guards (draft vs posted)
//! - Error types for journal rule violations

pub mod error;
pub mod reversal;
pub mod sequence;
pub mod state;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::JournalError;
pub use reversal::{
    build_reversal_lines, reversal_description, reverse_line, REVERSAL_DESCRIPTION_PREFIX,
};
pub use sequence::{
    format_entry_number, next_entry_number, parse_entry_number, EntryNumberParts, COUNTER_WIDTH,
};
pub use state::EntryState;
pub use types::{
    CreateJournalEntryInput, EntryTotals, JournalEntryType, JournalLineInput, LineSide, SourceRef,
};
pub use validation::{validate_lines, MIN_ENTRY_LINES};
