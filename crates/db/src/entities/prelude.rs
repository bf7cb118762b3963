//! `SeaORM` Entity prelude re-exporting all entities under their plural names.

pub use super::accounts::Entity as Accounts;
pub use super::general_ledger_entries::Entity as GeneralLedgerEntries;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::journal_entry_lines::Entity as JournalEntryLines;
