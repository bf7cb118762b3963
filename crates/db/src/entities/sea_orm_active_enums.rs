//! `SeaORM` active enums mapped to PostgreSQL enum types.
//!
//! Each enum here mirrors a pure domain enum from `folio_core`; the `From`
//! impls at the bottom bridge the two so repositories never match on raw
//! database strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account classification, stored in the `account_type` database enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    /// Resources owned by the organization.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Obligations owed to others.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Owner's residual interest.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Income earned.
    #[sea_orm(string_value = "revenue")]
    Revenue,
    /// Costs incurred.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Side on which an account's balance normally sits, stored in the
/// `normal_balance` database enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "normal_balance")]
pub enum NormalBalance {
    /// Balance increases on the debit side.
    #[sea_orm(string_value = "debit")]
    Debit,
    /// Balance increases on the credit side.
    #[sea_orm(string_value = "credit")]
    Credit,
}

/// Journal entry classification, stored in the `journal_entry_type`
/// database enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_entry_type")]
pub enum JournalEntryType {
    /// Regular business transaction.
    #[sea_orm(string_value = "standard")]
    Standard,
    /// Period-end adjusting entry.
    #[sea_orm(string_value = "adjusting")]
    Adjusting,
    /// Period-end closing entry.
    #[sea_orm(string_value = "closing")]
    Closing,
    /// Reversal of a previously posted entry.
    #[sea_orm(string_value = "reversing")]
    Reversing,
    /// Opening balance entry.
    #[sea_orm(string_value = "opening")]
    Opening,
    /// Correction of an earlier mistake.
    #[sea_orm(string_value = "correction")]
    Correction,
}

impl From<folio_core::account::AccountType> for AccountType {
    fn from(value: folio_core::account::AccountType) -> Self {
        match value {
            folio_core::account::AccountType::Asset => Self::Asset,
            folio_core::account::AccountType::Liability => Self::Liability,
            folio_core::account::AccountType::Equity => Self::Equity,
            folio_core::account::AccountType::Revenue => Self::Revenue,
            folio_core::account::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for folio_core::account::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<folio_core::account::NormalBalance> for NormalBalance {
    fn from(value: folio_core::account::NormalBalance) -> Self {
        match value {
            folio_core::account::NormalBalance::Debit => Self::Debit,
            folio_core::account::NormalBalance::Credit => Self::Credit,
        }
    }
}

impl From<NormalBalance> for folio_core::account::NormalBalance {
    fn from(value: NormalBalance) -> Self {
        match value {
            NormalBalance::Debit => Self::Debit,
            NormalBalance::Credit => Self::Credit,
        }
    }
}

impl From<folio_core::journal::JournalEntryType> for JournalEntryType {
    fn from(value: folio_core::journal::JournalEntryType) -> Self {
        match value {
            folio_core::journal::JournalEntryType::Standard => Self::Standard,
            folio_core::journal::JournalEntryType::Adjusting => Self::Adjusting,
            folio_core::journal::JournalEntryType::Closing => Self::Closing,
            folio_core::journal::JournalEntryType::Reversing => Self::Reversing,
            folio_core::journal::JournalEntryType::Opening => Self::Opening,
            folio_core::journal::JournalEntryType::Correction => Self::Correction,
        }
    }
}

impl From<JournalEntryType> for folio_core::journal::JournalEntryType {
    fn from(value: JournalEntryType) -> Self {
        match value {
            JournalEntryType::Standard => Self::Standard,
            JournalEntryType::Adjusting => Self::Adjusting,
            JournalEntryType::Closing => Self::Closing,
            JournalEntryType::Reversing => Self::Reversing,
            JournalEntryType::Opening => Self::Opening,
            JournalEntryType::Correction => Self::Correction,
        }
    }
}
