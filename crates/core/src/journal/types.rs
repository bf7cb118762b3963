//! Journal entry domain types.
//!
//! Defines the closed entry-type and line-side enums plus the input shapes
//! used to create journal entries. The entry-type-to-sequence-prefix mapping
//! is defined once here and referenced by sequence number generation.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use folio_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::JournalError;

/// Journal entry classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalEntryType {
    /// Ordinary business transaction.
    Standard,
    /// Period-end adjustment.
    Adjusting,
    /// Period-close entry.
    Closing,
    /// Offsetting entry that negates a posted entry.
    Reversing,
    /// Opening balance entry.
    Opening,
    /// Correction of a prior mistake.
    Correction,
}

impl JournalEntryType {
    /// All entry types.
    pub const ALL: [Self; 6] = [
        Self::Standard,
        Self::Adjusting,
        Self::Closing,
        Self::Reversing,
        Self::Opening,
        Self::Correction,
    ];

    /// Returns the sequence number prefix for this entry type.
    #[must_use]
    pub const fn sequence_prefix(self) -> &'static str {
        match self {
            Self::Standard => "JE",
            Self::Adjusting => "AJE",
            Self::Closing => "CJE",
            Self::Reversing => "RJE",
            Self::Opening => "OJE",
            Self::Correction => "COR",
        }
    }

    /// Returns the snake_case string form used in storage and APIs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Adjusting => "adjusting",
            Self::Closing => "closing",
            Self::Reversing => "reversing",
            Self::Opening => "opening",
            Self::Correction => "correction",
        }
    }
}

impl fmt::Display for JournalEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JournalEntryType {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "adjusting" => Ok(Self::Adjusting),
            "closing" => Ok(Self::Closing),
            "reversing" => Ok(Self::Reversing),
            "opening" => Ok(Self::Opening),
            "correction" => Ok(Self::Correction),
            _ => Err(JournalError::UnknownEntryType(s.to_string())),
        }
    }
}

/// Which side of the ledger a journal line posts to.
///
/// A line targets exactly one account on exactly one side; the type makes
/// the both-or-neither case unrepresentable in inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSide {
    /// Debit the account.
    Debit,
    /// Credit the account.
    Credit,
}

impl LineSide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }

    /// Splits an amount into a `(debit, credit)` pair for this side.
    #[must_use]
    pub fn split(self, amount: Decimal) -> (Decimal, Decimal) {
        match self {
            Self::Debit => (amount, Decimal::ZERO),
            Self::Credit => (Decimal::ZERO, amount),
        }
    }
}

/// Input for a single journal entry line.
#[derive(Debug, Clone)]
pub struct JournalLineInput {
    /// The account this line posts to.
    pub account_id: Uuid,
    /// Whether the account is debited or credited.
    pub side: LineSide,
    /// The amount (must be positive).
    pub amount: Decimal,
    /// Optional line description.
    pub description: Option<String>,
    /// Optional line reference.
    pub reference: Option<String>,
}

/// Link to the upstream record that produced an entry.
///
/// Used only by external callers (invoicing, payments, and so on); the
/// ledger stores it verbatim and never interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    /// Kind of source record, for example "invoice".
    pub source_type: String,
    /// ID of the source record.
    pub source_id: Uuid,
}

/// Input for creating a new journal entry.
#[derive(Debug, Clone)]
pub struct CreateJournalEntryInput {
    /// The organization this entry belongs to.
    pub organization_id: Uuid,
    /// The entry classification.
    pub entry_type: JournalEntryType,
    /// The entry date.
    pub entry_date: NaiveDate,
    /// A description of the entry.
    pub description: String,
    /// Optional reference (for example an invoice number).
    pub reference: Option<String>,
    /// The entry currency.
    pub currency: Currency,
    /// The entry lines (at least two).
    pub lines: Vec<JournalLineInput>,
    /// Optional upstream source linkage.
    pub source: Option<SourceRef>,
    /// The user creating the entry.
    pub created_by: Uuid,
}

/// Debit and credit totals for a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Total of debit-side line amounts.
    pub total_debit: Decimal,
    /// Total of credit-side line amounts.
    pub total_credit: Decimal,
    /// Whether debits equal credits exactly.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}
