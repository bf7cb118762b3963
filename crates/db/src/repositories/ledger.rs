//! Ledger repository: posting, retraction, and reversal of journal entries.
//!
//! This is the only component that writes `general_ledger_entries` rows or
//! mutates an account's cached balance. Every mutation runs in a single
//! database transaction with the affected account rows locked in id order,
//! so two posts touching the same account serialize instead of both
//! extending the balance chain from the same prior value.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use folio_core::account::NormalBalance;
use folio_core::journal::{
    build_reversal_lines, next_entry_number, reversal_description, JournalEntryType,
    JournalLineInput, LineSide,
};
use folio_core::posting::{check_balance_integrity, PostingError, RunningBalance};
use folio_shared::types::{OrganizationId, PageRequest, PageResponse};

use crate::cache::StatementCache;
use crate::entities::{accounts, general_ledger_entries, journal_entries, journal_entry_lines};

/// How many times a posting-side operation retries after a lock conflict.
const MAX_CONFLICT_RETRIES: u32 = 3;

/// Base delay between retries; scaled by the attempt number.
const RETRY_BACKOFF: Duration = Duration::from_millis(25);

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    NotFound(Uuid),

    /// Account is missing, inactive, or in another organization.
    #[error("Account not found or not active: {0}")]
    AccountNotFound(Uuid),

    /// Entry is already posted.
    #[error("Journal entry {0} is already posted")]
    AlreadyPosted(Uuid),

    /// Entry is not posted.
    #[error("Journal entry {0} is not posted")]
    NotPosted(Uuid),

    /// Entry has already been reversed.
    #[error("Journal entry {0} has already been reversed")]
    AlreadyReversed(Uuid),

    /// Retraction would cut the middle out of an account's balance chain.
    #[error("Cannot retract entry {entry_id}: account {account_id} has newer ledger rows")]
    NotChainTip {
        /// The entry being retracted.
        entry_id: Uuid,
        /// The account with newer rows.
        account_id: Uuid,
    },

    /// Line row does not have exactly one account side set.
    #[error("Journal line {0} does not have exactly one account side")]
    MalformedLine(Uuid),

    /// Lock conflicts persisted through every retry.
    #[error("Concurrent modification detected for entry {0}, please retry")]
    ConcurrentModification(Uuid),

    /// Posting invariant violated.
    #[error("{0}")]
    Posting(#[from] PostingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for reversing a posted entry.
#[derive(Debug, Clone)]
pub struct ReversalInput {
    /// Date the reversing entry takes effect.
    pub reversal_date: NaiveDate,
    /// Reason appended to the reversal description.
    pub reason: Option<String>,
    /// User creating and posting the reversal.
    pub created_by: Uuid,
}

/// The paired entries after a reversal.
#[derive(Debug, Clone)]
pub struct ReversalOutcome {
    /// The original entry, now carrying the reversal back-link.
    pub original: journal_entries::Model,
    /// The posted reversing entry.
    pub reversing: journal_entries::Model,
}

/// Ledger repository for posting operations.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
    cache: StatementCache,
}

impl LedgerRepository {
    /// Creates a new ledger repository sharing the statement cache.
    #[must_use]
    pub const fn new(db: DatabaseConnection, cache: StatementCache) -> Self {
        Self { db, cache }
    }

    /// Posts a draft journal entry: one ledger row per line, running
    /// balances chained per account, cached balances overwritten, and the
    /// entry flagged posted, all in one transaction.
    ///
    /// Lock conflicts with concurrent posts retry up to
    /// [`MAX_CONFLICT_RETRIES`] times with backoff.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Entry not found in the organization
    /// - Entry is already posted
    /// - Entry has no lines
    /// - A line account is missing or inactive
    /// - An account's cached balance disagrees with its ledger chain
    pub async fn post_entry(
        &self,
        organization_id: Uuid,
        entry_id: Uuid,
        posted_by: Uuid,
    ) -> Result<journal_entries::Model, LedgerError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.try_post(organization_id, entry_id, posted_by).await {
                Err(LedgerError::Database(e)) if is_lock_conflict(&e) => {
                    if attempt >= MAX_CONFLICT_RETRIES {
                        return Err(LedgerError::ConcurrentModification(entry_id));
                    }
                    warn!(attempt, entry_id = %entry_id, "Posting hit a lock conflict, retrying");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                other => return other,
            }
        }
    }

    /// Removes a posted entry's ledger rows and returns it to draft.
    ///
    /// This is the low-level undo for entries posted in error. Corrections
    /// that must stay visible in history go through
    /// [`LedgerRepository::reverse_entry`] instead.
    ///
    /// Every affected account's newest ledger rows must belong to this
    /// entry: deleting from the middle of a balance chain would leave the
    /// running balances after the gap wrong.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Entry not found in the organization
    /// - Entry is not posted, or has been reversed
    /// - An affected account has newer ledger rows from other entries
    pub async fn retract_entry(
        &self,
        organization_id: Uuid,
        entry_id: Uuid,
    ) -> Result<journal_entries::Model, LedgerError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.try_retract(organization_id, entry_id).await {
                Err(LedgerError::Database(e)) if is_lock_conflict(&e) => {
                    if attempt >= MAX_CONFLICT_RETRIES {
                        return Err(LedgerError::ConcurrentModification(entry_id));
                    }
                    warn!(attempt, entry_id = %entry_id, "Retraction hit a lock conflict, retrying");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                other => return other,
            }
        }
    }

    /// Reverses a posted entry with a new REVERSING entry whose lines have
    /// debit and credit swapped: same accounts, same amounts. The reversing
    /// entry is created and posted in the same transaction, and the
    /// original is linked to it. Neither entry is deleted; the net ledger
    /// effect is zero.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Original not found in the organization
    /// - Original is not posted, or was already reversed
    /// - Posting the reversing entry fails
    pub async fn reverse_entry(
        &self,
        organization_id: Uuid,
        original_id: Uuid,
        input: ReversalInput,
    ) -> Result<ReversalOutcome, LedgerError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.try_reverse(organization_id, original_id, &input).await {
                Err(LedgerError::Database(e))
                    if is_lock_conflict(&e) || is_unique_violation(&e) =>
                {
                    if attempt >= MAX_CONFLICT_RETRIES {
                        return Err(LedgerError::ConcurrentModification(original_id));
                    }
                    warn!(attempt, entry_id = %original_id, "Reversal hit a conflict, retrying");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                other => return other,
            }
        }
    }

    /// Returns an account's balance as of a date, read from the newest
    /// ledger row dated at or before it. Defaults to today, so posted
    /// rows dated in the future do not count yet. Zero when no rows
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is not in the organization or the
    /// query fails.
    pub async fn account_balance(
        &self,
        organization_id: Uuid,
        account_id: Uuid,
        as_of: Option<NaiveDate>,
    ) -> Result<Decimal, LedgerError> {
        self.require_account(organization_id, account_id).await?;

        let cutoff = as_of.unwrap_or_else(|| Utc::now().date_naive());
        let latest = general_ledger_entries::Entity::find()
            .filter(general_ledger_entries::Column::AccountId.eq(account_id))
            .filter(general_ledger_entries::Column::EntryDate.lte(cutoff))
            .order_by_desc(general_ledger_entries::Column::EntryDate)
            .order_by_desc(general_ledger_entries::Column::Sequence)
            .limit(1)
            .one(&self.db)
            .await?;

        Ok(latest.map_or(Decimal::ZERO, |row| row.running_balance))
    }

    /// Lists an account's ledger rows in chain order with pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is not in the organization or the
    /// query fails.
    pub async fn account_ledger(
        &self,
        organization_id: Uuid,
        account_id: Uuid,
        page: PageRequest,
    ) -> Result<PageResponse<general_ledger_entries::Model>, LedgerError> {
        self.require_account(organization_id, account_id).await?;

        let query = general_ledger_entries::Entity::find()
            .filter(general_ledger_entries::Column::AccountId.eq(account_id));

        let page = page.sanitized();
        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_asc(general_ledger_entries::Column::EntryDate)
            .order_by_asc(general_ledger_entries::Column::Sequence)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// One posting attempt inside its own transaction.
    async fn try_post(
        &self,
        organization_id: Uuid,
        entry_id: Uuid,
        posted_by: Uuid,
    ) -> Result<journal_entries::Model, LedgerError> {
        let txn = self.db.begin().await?;

        let entry = journal_entries::Entity::find_by_id(entry_id)
            .filter(journal_entries::Column::OrganizationId.eq(organization_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LedgerError::NotFound(entry_id))?;

        if entry.is_posted {
            return Err(LedgerError::AlreadyPosted(entry_id));
        }

        let lines = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::JournalEntryId.eq(entry_id))
            .order_by_asc(journal_entry_lines::Column::LineNumber)
            .all(&txn)
            .await?;

        if lines.is_empty() {
            return Err(PostingError::NoLines(entry_id).into());
        }

        let mut account_ids = Vec::with_capacity(lines.len());
        for line in &lines {
            let (account_id, _, _) = line_posting(
                line.id,
                line.debit_account_id,
                line.credit_account_id,
                line.amount,
            )?;
            account_ids.push(account_id);
        }

        let locked = self
            .lock_accounts(&txn, organization_id, account_ids)
            .await?;

        // Accounts without ledger history can be deactivated after the
        // draft was created; posting must re-check.
        if let Some(inactive) = locked.values().find(|a| !a.is_active) {
            return Err(LedgerError::AccountNotFound(inactive.id));
        }

        let balances = self.apply_to_ledger(&txn, &entry, &lines, &locked).await?;
        self.write_balances(&txn, &balances).await?;

        let now = Utc::now();
        let mut active: journal_entries::ActiveModel = entry.into();
        active.is_posted = Set(true);
        active.posted_at = Set(Some(now.into()));
        active.posted_by = Set(Some(posted_by));
        active.updated_at = Set(now.into());
        let posted = active.update(&txn).await?;

        txn.commit().await?;

        self.cache
            .invalidate_organization(OrganizationId::from_uuid(organization_id));
        info!(
            entry_id = %entry_id,
            entry_number = %posted.entry_number,
            "Journal entry posted"
        );

        Ok(posted)
    }

    /// One retraction attempt inside its own transaction.
    async fn try_retract(
        &self,
        organization_id: Uuid,
        entry_id: Uuid,
    ) -> Result<journal_entries::Model, LedgerError> {
        let txn = self.db.begin().await?;

        let entry = journal_entries::Entity::find_by_id(entry_id)
            .filter(journal_entries::Column::OrganizationId.eq(organization_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LedgerError::NotFound(entry_id))?;

        if !entry.is_posted {
            return Err(LedgerError::NotPosted(entry_id));
        }
        if entry.reversed_by_entry_id.is_some() {
            return Err(LedgerError::AlreadyReversed(entry_id));
        }

        let gl_rows = general_ledger_entries::Entity::find()
            .filter(general_ledger_entries::Column::JournalEntryId.eq(entry_id))
            .all(&txn)
            .await?;

        if gl_rows.is_empty() {
            return Err(PostingError::NoLines(entry_id).into());
        }

        let account_ids: Vec<Uuid> = gl_rows.iter().map(|row| row.account_id).collect();
        let locked = self
            .lock_accounts(&txn, organization_id, account_ids)
            .await?;

        // Our rows must be the newest for every affected account
        for account_id in locked.keys() {
            let newest = general_ledger_entries::Entity::find()
                .filter(general_ledger_entries::Column::AccountId.eq(*account_id))
                .order_by_desc(general_ledger_entries::Column::Sequence)
                .limit(1)
                .one(&txn)
                .await?;

            if let Some(row) = newest
                && row.journal_entry_id != entry_id
            {
                return Err(LedgerError::NotChainTip {
                    entry_id,
                    account_id: *account_id,
                });
            }
        }

        // Undo each row's effect on its account
        let mut balances: HashMap<Uuid, Decimal> = locked
            .values()
            .map(|account| (account.id, account.current_balance))
            .collect();

        for row in &gl_rows {
            let account = locked
                .get(&row.account_id)
                .ok_or(LedgerError::AccountNotFound(row.account_id))?;
            let normal: NormalBalance = account.normal_balance.clone().into();
            let change = normal.balance_change(row.debit_amount, row.credit_amount);
            if let Some(balance) = balances.get_mut(&row.account_id) {
                *balance -= change;
            }
        }

        general_ledger_entries::Entity::delete_many()
            .filter(general_ledger_entries::Column::JournalEntryId.eq(entry_id))
            .exec(&txn)
            .await?;

        self.write_balances(&txn, &balances).await?;

        let reverses = entry.reverses_entry_id;
        let now = Utc::now();
        let mut active: journal_entries::ActiveModel = entry.into();
        active.is_posted = Set(false);
        active.posted_at = Set(None);
        active.posted_by = Set(None);
        active.updated_at = Set(now.into());
        let retracted = active.update(&txn).await?;

        // Retracting a reversing entry un-reverses its original
        if let Some(original_id) = reverses
            && let Some(original) = journal_entries::Entity::find_by_id(original_id)
                .one(&txn)
                .await?
        {
            let mut active: journal_entries::ActiveModel = original.into();
            active.reversed_by_entry_id = Set(None);
            active.updated_at = Set(now.into());
            active.update(&txn).await?;
        }

        txn.commit().await?;

        self.cache
            .invalidate_organization(OrganizationId::from_uuid(organization_id));
        info!(
            entry_id = %entry_id,
            entry_number = %retracted.entry_number,
            "Journal entry retracted to draft"
        );

        Ok(retracted)
    }

    /// One reversal attempt inside its own transaction.
    async fn try_reverse(
        &self,
        organization_id: Uuid,
        original_id: Uuid,
        input: &ReversalInput,
    ) -> Result<ReversalOutcome, LedgerError> {
        let txn = self.db.begin().await?;

        let original = journal_entries::Entity::find_by_id(original_id)
            .filter(journal_entries::Column::OrganizationId.eq(organization_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LedgerError::NotFound(original_id))?;

        if !original.is_posted {
            return Err(LedgerError::NotPosted(original_id));
        }
        if original.reversed_by_entry_id.is_some() {
            return Err(LedgerError::AlreadyReversed(original_id));
        }

        let original_lines = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::JournalEntryId.eq(original_id))
            .order_by_asc(journal_entry_lines::Column::LineNumber)
            .all(&txn)
            .await?;

        if original_lines.is_empty() {
            return Err(PostingError::NoLines(original_id).into());
        }

        let mut line_inputs = Vec::with_capacity(original_lines.len());
        for line in &original_lines {
            let (account_id, debit, _credit) = line_posting(
                line.id,
                line.debit_account_id,
                line.credit_account_id,
                line.amount,
            )?;
            let side = if debit > Decimal::ZERO {
                LineSide::Debit
            } else {
                LineSide::Credit
            };
            line_inputs.push(JournalLineInput {
                account_id,
                side,
                amount: line.amount,
                description: line.description.clone(),
                reference: line.reference.clone(),
            });
        }
        let reversal_lines = build_reversal_lines(&line_inputs);

        let year = input.reversal_date.year();
        let entry_number = self
            .next_reversing_number(&txn, organization_id, year)
            .await?;

        let description = match &input.reason {
            Some(reason) => {
                format!("{} ({reason})", reversal_description(&original.description))
            }
            None => reversal_description(&original.description),
        };

        // The reversing header starts as a draft so the line inserts pass
        // the posted-entry guards, then flips posted in the same
        // transaction.
        let now = Utc::now();
        let reversing_id = Uuid::new_v4();
        let header = journal_entries::ActiveModel {
            id: Set(reversing_id),
            organization_id: Set(organization_id),
            entry_number: Set(entry_number),
            entry_type: Set(JournalEntryType::Reversing.into()),
            entry_date: Set(input.reversal_date),
            description: Set(description),
            reference: Set(original.reference.clone()),
            currency: Set(original.currency.clone()),
            total_debit: Set(original.total_debit),
            total_credit: Set(original.total_credit),
            is_posted: Set(false),
            posted_at: Set(None),
            posted_by: Set(None),
            reverses_entry_id: Set(Some(original_id)),
            reversed_by_entry_id: Set(None),
            source_type: Set(original.source_type.clone()),
            source_id: Set(original.source_id),
            created_by: Set(input.created_by),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let reversing = header.insert(&txn).await?;

        let mut line_models = Vec::with_capacity(reversal_lines.len());
        let mut line_number = 1i32;
        for line in &reversal_lines {
            let (debit_account_id, credit_account_id) = match line.side {
                LineSide::Debit => (Some(line.account_id), None),
                LineSide::Credit => (None, Some(line.account_id)),
            };
            let row = journal_entry_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                journal_entry_id: Set(reversing_id),
                line_number: Set(line_number),
                debit_account_id: Set(debit_account_id),
                credit_account_id: Set(credit_account_id),
                amount: Set(line.amount),
                description: Set(line.description.clone()),
                reference: Set(line.reference.clone()),
                created_at: Set(now.into()),
            };
            line_models.push(row.insert(&txn).await?);
            line_number += 1;
        }

        let account_ids: Vec<Uuid> = reversal_lines.iter().map(|line| line.account_id).collect();
        let locked = self
            .lock_accounts(&txn, organization_id, account_ids)
            .await?;

        let balances = self
            .apply_to_ledger(&txn, &reversing, &line_models, &locked)
            .await?;
        self.write_balances(&txn, &balances).await?;

        let mut active: journal_entries::ActiveModel = reversing.into();
        active.is_posted = Set(true);
        active.posted_at = Set(Some(now.into()));
        active.posted_by = Set(Some(input.created_by));
        active.updated_at = Set(now.into());
        let reversing = active.update(&txn).await?;

        let mut active: journal_entries::ActiveModel = original.into();
        active.reversed_by_entry_id = Set(Some(reversing_id));
        active.updated_at = Set(now.into());
        let original = active.update(&txn).await?;

        txn.commit().await?;

        self.cache
            .invalidate_organization(OrganizationId::from_uuid(organization_id));
        info!(
            original_id = %original_id,
            reversing_id = %reversing_id,
            entry_number = %reversing.entry_number,
            "Journal entry reversed"
        );

        Ok(ReversalOutcome {
            original,
            reversing,
        })
    }

    /// Locks the given accounts `FOR UPDATE` in id order and returns them
    /// keyed by id. Missing ids fail the lock.
    async fn lock_accounts(
        &self,
        txn: &DatabaseTransaction,
        organization_id: Uuid,
        mut ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, accounts::Model>, LedgerError> {
        ids.sort_unstable();
        ids.dedup();

        let models = accounts::Entity::find()
            .filter(accounts::Column::OrganizationId.eq(organization_id))
            .filter(accounts::Column::Id.is_in(ids.clone()))
            .order_by_asc(accounts::Column::Id)
            .lock_exclusive()
            .all(txn)
            .await?;

        if let Some(missing) = ids.iter().find(|id| !models.iter().any(|a| a.id == **id)) {
            return Err(LedgerError::AccountNotFound(*missing));
        }

        Ok(models.into_iter().map(|a| (a.id, a)).collect())
    }

    /// Inserts one ledger row per line and returns each touched account's
    /// final running balance.
    ///
    /// Before extending an account's chain, the cached balance is checked
    /// against the newest stored running balance. A mismatch means some
    /// earlier write broke an invariant; posting aborts rather than
    /// compounding it.
    async fn apply_to_ledger(
        &self,
        txn: &DatabaseTransaction,
        entry: &journal_entries::Model,
        lines: &[journal_entry_lines::Model],
        locked: &HashMap<Uuid, accounts::Model>,
    ) -> Result<HashMap<Uuid, Decimal>, LedgerError> {
        let now = Utc::now().into();

        let mut balances: HashMap<Uuid, Decimal> = HashMap::with_capacity(locked.len());
        for account in locked.values() {
            let latest = self.latest_running_balance(txn, account.id).await?;
            if let Err(e) = check_balance_integrity(account.id, account.current_balance, latest) {
                error!(
                    account_id = %account.id,
                    error = %e,
                    "Cached balance disagrees with ledger, aborting post"
                );
                return Err(e.into());
            }
            balances.insert(account.id, account.current_balance);
        }

        for line in lines {
            let (account_id, debit, credit) = line_posting(
                line.id,
                line.debit_account_id,
                line.credit_account_id,
                line.amount,
            )?;
            let account = locked
                .get(&account_id)
                .ok_or(LedgerError::AccountNotFound(account_id))?;

            let normal: NormalBalance = account.normal_balance.clone().into();
            let change = normal.balance_change(debit, credit);
            let prior = balances.get(&account_id).copied().unwrap_or(Decimal::ZERO);
            let running = RunningBalance::from_prior(prior, change);
            balances.insert(account_id, running.current_balance);

            let row = general_ledger_entries::ActiveModel {
                id: Set(Uuid::new_v4()),
                organization_id: Set(entry.organization_id),
                account_id: Set(account_id),
                journal_entry_id: Set(entry.id),
                entry_date: Set(entry.entry_date),
                debit_amount: Set(debit),
                credit_amount: Set(credit),
                running_balance: Set(running.current_balance),
                description: Set(line
                    .description
                    .clone()
                    .or_else(|| Some(entry.description.clone()))),
                source_type: Set(entry.source_type.clone()),
                source_id: Set(entry.source_id),
                created_at: Set(now),
                // sequence stays unset: the database assigns insert order
                ..Default::default()
            };
            row.insert(txn).await?;
        }

        Ok(balances)
    }

    /// Overwrites each account's cached balance with its new chain tip.
    async fn write_balances(
        &self,
        txn: &DatabaseTransaction,
        balances: &HashMap<Uuid, Decimal>,
    ) -> Result<(), LedgerError> {
        let now = Utc::now().into();
        for (account_id, balance) in balances {
            let active = accounts::ActiveModel {
                id: Set(*account_id),
                current_balance: Set(*balance),
                updated_at: Set(now),
                ..Default::default()
            };
            active.update(txn).await?;
        }

        Ok(())
    }

    /// Returns the newest stored running balance for an account, if any
    /// rows exist.
    async fn latest_running_balance(
        &self,
        txn: &DatabaseTransaction,
        account_id: Uuid,
    ) -> Result<Option<Decimal>, LedgerError> {
        let latest = general_ledger_entries::Entity::find()
            .filter(general_ledger_entries::Column::AccountId.eq(account_id))
            .order_by_desc(general_ledger_entries::Column::Sequence)
            .limit(1)
            .one(txn)
            .await?;

        Ok(latest.map(|row| row.running_balance))
    }

    /// Allocates the next reversing entry number inside the transaction.
    async fn next_reversing_number(
        &self,
        txn: &DatabaseTransaction,
        organization_id: Uuid,
        year: i32,
    ) -> Result<String, LedgerError> {
        let prefix = JournalEntryType::Reversing.sequence_prefix();
        let existing: Vec<String> = journal_entries::Entity::find()
            .select_only()
            .column(journal_entries::Column::EntryNumber)
            .filter(journal_entries::Column::OrganizationId.eq(organization_id))
            .filter(journal_entries::Column::EntryNumber.like(format!("{prefix}-{year}-%")))
            .into_tuple()
            .all(txn)
            .await?;

        Ok(next_entry_number(
            JournalEntryType::Reversing,
            year,
            existing.iter().map(String::as_str),
        ))
    }

    /// Fails unless the account exists in the organization.
    async fn require_account(
        &self,
        organization_id: Uuid,
        account_id: Uuid,
    ) -> Result<accounts::Model, LedgerError> {
        accounts::Entity::find_by_id(account_id)
            .filter(accounts::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))
    }
}

// ============================================================================
// Posting Helpers
// ============================================================================

/// Splits a line row into its account and (debit, credit) amounts.
///
/// The single-side CHECK constraint guarantees exactly one account is set;
/// a row violating it can only come from writes outside this crate.
fn line_posting(
    line_id: Uuid,
    debit_account_id: Option<Uuid>,
    credit_account_id: Option<Uuid>,
    amount: Decimal,
) -> Result<(Uuid, Decimal, Decimal), LedgerError> {
    match (debit_account_id, credit_account_id) {
        (Some(account_id), None) => Ok((account_id, amount, Decimal::ZERO)),
        (None, Some(account_id)) => Ok((account_id, Decimal::ZERO, amount)),
        _ => Err(LedgerError::MalformedLine(line_id)),
    }
}

/// Returns true when the error is a lock ordering or serialization
/// conflict worth retrying.
fn is_lock_conflict(e: &DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("deadlock detected") || msg.contains("could not serialize access")
}

/// Returns true when the error is a unique constraint violation, the
/// signal that a concurrent reversal took the same entry number.
fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
