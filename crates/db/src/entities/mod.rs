//! `SeaORM` entity definitions for the ledger schema.

pub mod prelude;

pub mod accounts;
pub mod general_ledger_entries;
pub mod journal_entries;
pub mod journal_entry_lines;
pub mod sea_orm_active_enums;
