//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod journal_entry;
pub mod ledger;
pub mod statement;

pub use account::{
    AccountFilter, AccountRepoError, AccountRepository, CreateAccountInput, UpdateAccountInput,
};
pub use journal_entry::{
    JournalEntryError, JournalEntryFilter, JournalEntryRepository, JournalEntryWithLines,
    UpdateJournalEntryInput,
};
pub use ledger::{LedgerError, LedgerRepository, ReversalInput, ReversalOutcome};
pub use statement::{StatementRepoError, StatementRepository};
