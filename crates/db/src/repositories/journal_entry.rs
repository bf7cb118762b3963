//! Journal entry repository for the draft entry lifecycle.
//!
//! Owns `journal_entries` and `journal_entry_lines` rows while an entry is
//! in draft. Posting, reversal, and everything that touches the general
//! ledger live in the ledger repository.

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::warn;
use uuid::Uuid;

use folio_core::journal::{
    next_entry_number, validate_lines, CreateJournalEntryInput, EntryState, EntryTotals,
    JournalEntryType, JournalLineInput, LineSide,
};
use folio_shared::types::{PageRequest, PageResponse};

use crate::entities::{accounts, journal_entries, journal_entry_lines};

/// How many times entry creation retries when a concurrent writer takes the
/// allocated entry number first.
const MAX_NUMBER_ATTEMPTS: u32 = 3;

/// Error types for journal entry operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalEntryError {
    /// Entry rule violated (unbalanced, too few lines, bad amounts).
    #[error("{0}")]
    Rule(#[from] folio_core::journal::JournalError),

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    NotFound(Uuid),

    /// A line references an account that is missing, inactive, or belongs
    /// to another organization.
    #[error("Account not found or not active: {0}")]
    AccountNotFound(Uuid),

    /// Posted entries cannot be modified or deleted.
    #[error("Journal entry {0} is posted and cannot be changed")]
    AlreadyPosted(Uuid),

    /// Entry number allocation kept colliding with concurrent writers.
    #[error("Could not allocate a unique entry number after {0} attempts")]
    NumberExhausted(u32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for updating a draft journal entry.
///
/// Providing `lines` replaces the whole line set; totals are recomputed
/// from the replacement lines.
#[derive(Debug, Clone, Default)]
pub struct UpdateJournalEntryInput {
    /// Entry date.
    pub entry_date: Option<NaiveDate>,
    /// Description.
    pub description: Option<String>,
    /// Reference.
    pub reference: Option<Option<String>>,
    /// Replacement lines.
    pub lines: Option<Vec<JournalLineInput>>,
}

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Default)]
pub struct JournalEntryFilter {
    /// Filter by entry type.
    pub entry_type: Option<JournalEntryType>,
    /// Filter by posted flag.
    pub is_posted: Option<bool>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

/// Journal entry with its lines.
#[derive(Debug, Clone)]
pub struct JournalEntryWithLines {
    /// Entry header.
    pub entry: journal_entries::Model,
    /// Lines ordered by line number.
    pub lines: Vec<journal_entry_lines::Model>,
}

/// Journal entry repository for draft CRUD operations.
#[derive(Debug, Clone)]
pub struct JournalEntryRepository {
    db: DatabaseConnection,
}

impl JournalEntryRepository {
    /// Creates a new journal entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new journal entry in draft state.
    ///
    /// The entry number is allocated from the per-organization sequence for
    /// the entry type and the entry date's year. When a concurrent creator
    /// takes the same number first, allocation retries against the unique
    /// index up to [`MAX_NUMBER_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The lines are unbalanced, single-sided, fewer than two, or carry
    ///   non-positive amounts
    /// - A line account is missing, inactive, or in another organization
    /// - Entry number allocation keeps colliding
    pub async fn create_entry(
        &self,
        input: CreateJournalEntryInput,
    ) -> Result<JournalEntryWithLines, JournalEntryError> {
        let totals = validate_lines(&input.lines)?;
        self.verify_line_accounts(input.organization_id, &input.lines)
            .await?;

        let year = input.entry_date.year();

        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let entry_number = self
                .next_number(input.organization_id, input.entry_type, year)
                .await?;

            let txn = self.db.begin().await?;

            let entry = match self
                .insert_entry(&txn, &input, &entry_number, &totals)
                .await
            {
                Ok(entry) => entry,
                Err(e) if is_unique_violation(&e) => {
                    txn.rollback().await?;
                    warn!(
                        attempt,
                        entry_number = %entry_number,
                        "Entry number taken by concurrent writer, retrying"
                    );
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let lines = self.insert_lines(&txn, entry.id, &input.lines).await?;
            txn.commit().await?;

            return Ok(JournalEntryWithLines { entry, lines });
        }

        Err(JournalEntryError::NumberExhausted(MAX_NUMBER_ATTEMPTS))
    }

    /// Gets a journal entry by ID with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is not found or the database query
    /// fails.
    pub async fn get_entry(
        &self,
        organization_id: Uuid,
        entry_id: Uuid,
    ) -> Result<JournalEntryWithLines, JournalEntryError> {
        let entry = journal_entries::Entity::find_by_id(entry_id)
            .filter(journal_entries::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(JournalEntryError::NotFound(entry_id))?;

        let lines = self.fetch_lines(entry_id).await?;

        Ok(JournalEntryWithLines { entry, lines })
    }

    /// Lists journal entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_entries(
        &self,
        organization_id: Uuid,
        filter: JournalEntryFilter,
        page: PageRequest,
    ) -> Result<PageResponse<journal_entries::Model>, JournalEntryError> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::OrganizationId.eq(organization_id));

        if let Some(entry_type) = filter.entry_type {
            let db_type: crate::entities::sea_orm_active_enums::JournalEntryType =
                entry_type.into();
            query = query.filter(journal_entries::Column::EntryType.eq(db_type));
        }

        if let Some(is_posted) = filter.is_posted {
            query = query.filter(journal_entries::Column::IsPosted.eq(is_posted));
        }

        if let Some(date_from) = filter.date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(date_from));
        }

        if let Some(date_to) = filter.date_to {
            query = query.filter(journal_entries::Column::EntryDate.lte(date_to));
        }

        let page = page.sanitized();
        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::EntryNumber)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Updates a draft journal entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Entry not found in the organization
    /// - Entry is already posted
    /// - Replacement lines fail validation or reference bad accounts
    pub async fn update_entry(
        &self,
        organization_id: Uuid,
        entry_id: Uuid,
        input: UpdateJournalEntryInput,
    ) -> Result<JournalEntryWithLines, JournalEntryError> {
        let entry = journal_entries::Entity::find_by_id(entry_id)
            .filter(journal_entries::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(JournalEntryError::NotFound(entry_id))?;

        if !EntryState::from_posted_flag(entry.is_posted).can_update() {
            return Err(JournalEntryError::AlreadyPosted(entry_id));
        }

        // Validate replacement lines before touching any rows
        let new_totals = match &input.lines {
            Some(lines) => {
                let totals = validate_lines(lines)?;
                self.verify_line_accounts(organization_id, lines).await?;
                Some(totals)
            }
            None => None,
        };

        let txn = self.db.begin().await?;

        let mut active: journal_entries::ActiveModel = entry.into();

        if let Some(entry_date) = input.entry_date {
            active.entry_date = Set(entry_date);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(reference) = input.reference {
            active.reference = Set(reference);
        }
        if let Some(totals) = &new_totals {
            active.total_debit = Set(totals.total_debit);
            active.total_credit = Set(totals.total_credit);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&txn).await?;

        let lines = if let Some(lines) = input.lines {
            journal_entry_lines::Entity::delete_many()
                .filter(journal_entry_lines::Column::JournalEntryId.eq(entry_id))
                .exec(&txn)
                .await?;
            self.insert_lines(&txn, entry_id, &lines).await?
        } else {
            Vec::new()
        };

        txn.commit().await?;

        let lines = if lines.is_empty() {
            self.fetch_lines(entry_id).await?
        } else {
            lines
        };

        Ok(JournalEntryWithLines {
            entry: updated,
            lines,
        })
    }

    /// Deletes a draft journal entry and its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is not found or already posted.
    pub async fn delete_entry(
        &self,
        organization_id: Uuid,
        entry_id: Uuid,
    ) -> Result<(), JournalEntryError> {
        let entry = journal_entries::Entity::find_by_id(entry_id)
            .filter(journal_entries::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(JournalEntryError::NotFound(entry_id))?;

        if !EntryState::from_posted_flag(entry.is_posted).can_delete() {
            return Err(JournalEntryError::AlreadyPosted(entry_id));
        }

        // Lines go with the header via FK cascade
        journal_entries::Entity::delete_by_id(entry_id)
            .exec(&self.db)
            .await?;

        Ok(())
    }

    /// Allocates the next entry number for the type and year.
    async fn next_number(
        &self,
        organization_id: Uuid,
        entry_type: JournalEntryType,
        year: i32,
    ) -> Result<String, JournalEntryError> {
        let prefix = entry_type.sequence_prefix();
        let existing: Vec<String> = journal_entries::Entity::find()
            .select_only()
            .column(journal_entries::Column::EntryNumber)
            .filter(journal_entries::Column::OrganizationId.eq(organization_id))
            .filter(journal_entries::Column::EntryNumber.like(format!("{prefix}-{year}-%")))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(next_entry_number(
            entry_type,
            year,
            existing.iter().map(String::as_str),
        ))
    }

    /// Inserts the entry header in draft state.
    async fn insert_entry(
        &self,
        txn: &DatabaseTransaction,
        input: &CreateJournalEntryInput,
        entry_number: &str,
        totals: &EntryTotals,
    ) -> Result<journal_entries::Model, DbErr> {
        let now = Utc::now().into();

        let entry = journal_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(input.organization_id),
            entry_number: Set(entry_number.to_owned()),
            entry_type: Set(input.entry_type.into()),
            entry_date: Set(input.entry_date),
            description: Set(input.description.clone()),
            reference: Set(input.reference.clone()),
            currency: Set(input.currency.to_string()),
            total_debit: Set(totals.total_debit),
            total_credit: Set(totals.total_credit),
            is_posted: Set(false),
            posted_at: Set(None),
            posted_by: Set(None),
            reverses_entry_id: Set(None),
            reversed_by_entry_id: Set(None),
            source_type: Set(input.source.as_ref().map(|s| s.source_type.clone())),
            source_id: Set(input.source.as_ref().map(|s| s.source_id)),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        entry.insert(txn).await
    }

    /// Inserts lines numbered from 1 in input order.
    async fn insert_lines(
        &self,
        txn: &DatabaseTransaction,
        entry_id: Uuid,
        lines: &[JournalLineInput],
    ) -> Result<Vec<journal_entry_lines::Model>, DbErr> {
        let now = Utc::now().into();
        let mut result = Vec::with_capacity(lines.len());
        let mut line_number = 1i32;

        for line in lines {
            let (debit_account_id, credit_account_id) = match line.side {
                LineSide::Debit => (Some(line.account_id), None),
                LineSide::Credit => (None, Some(line.account_id)),
            };

            let row = journal_entry_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                journal_entry_id: Set(entry_id),
                line_number: Set(line_number),
                debit_account_id: Set(debit_account_id),
                credit_account_id: Set(credit_account_id),
                amount: Set(line.amount),
                description: Set(line.description.clone()),
                reference: Set(line.reference.clone()),
                created_at: Set(now),
            };

            result.push(row.insert(txn).await?);
            line_number += 1;
        }

        Ok(result)
    }

    /// Fetches an entry's lines ordered by line number.
    async fn fetch_lines(
        &self,
        entry_id: Uuid,
    ) -> Result<Vec<journal_entry_lines::Model>, JournalEntryError> {
        let lines = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::JournalEntryId.eq(entry_id))
            .order_by_asc(journal_entry_lines::Column::LineNumber)
            .all(&self.db)
            .await?;

        Ok(lines)
    }

    /// Checks that every referenced account exists, is active, and belongs
    /// to the organization.
    async fn verify_line_accounts(
        &self,
        organization_id: Uuid,
        lines: &[JournalLineInput],
    ) -> Result<(), JournalEntryError> {
        let mut wanted: Vec<Uuid> = lines.iter().map(|line| line.account_id).collect();
        wanted.sort_unstable();
        wanted.dedup();

        let found: Vec<Uuid> = accounts::Entity::find()
            .select_only()
            .column(accounts::Column::Id)
            .filter(accounts::Column::OrganizationId.eq(organization_id))
            .filter(accounts::Column::IsActive.eq(true))
            .filter(accounts::Column::Id.is_in(wanted.clone()))
            .into_tuple()
            .all(&self.db)
            .await?;

        if let Some(missing) = wanted.iter().find(|id| !found.contains(id)) {
            return Err(JournalEntryError::AccountNotFound(*missing));
        }

        Ok(())
    }
}

/// Returns true when the error is a unique constraint violation, the signal
/// that a concurrent writer took the same entry number.
fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
