//! Statement repository: read-only financial statement generation.
//!
//! Aggregates general ledger rows into trial balance, balance sheet, and
//! income statement reports. Results are cached with a short TTL; the
//! ledger repository invalidates the organization's cached statements
//! whenever it writes new rows.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use folio_core::statements::{
    AccountBalance, BalanceSheetReport, IncomeStatementReport, StatementClassification,
    StatementService, TrialBalanceReport,
};
use folio_shared::types::{Currency, OrganizationId};

use crate::cache::{CachedStatement, StatementCache, StatementKey, StatementKind};
use crate::entities::{accounts, general_ledger_entries, sea_orm_active_enums::AccountType};

/// Error types for statement operations.
#[derive(Debug, thiserror::Error)]
pub enum StatementRepoError {
    /// Statement rule violated (bad period).
    #[error("{0}")]
    Rule(#[from] folio_core::statements::StatementError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Statement repository for report queries.
#[derive(Debug, Clone)]
pub struct StatementRepository {
    db: DatabaseConnection,
    classification: StatementClassification,
    cache: StatementCache,
}

impl StatementRepository {
    /// Creates a new statement repository.
    ///
    /// The cache must be the same instance the ledger repository
    /// invalidates on writes.
    #[must_use]
    pub const fn new(
        db: DatabaseConnection,
        classification: StatementClassification,
        cache: StatementCache,
    ) -> Self {
        Self {
            db,
            classification,
            cache,
        }
    }

    // ========================================================================
    // Trial Balance
    // ========================================================================

    /// Generates a trial balance over every active account as of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn trial_balance(
        &self,
        organization_id: Uuid,
        as_of: NaiveDate,
        currency: Currency,
    ) -> Result<TrialBalanceReport, StatementRepoError> {
        let key = StatementKey {
            organization_id: OrganizationId::from_uuid(organization_id),
            kind: StatementKind::TrialBalance,
            period_start: None,
            as_of,
        };

        if let Some(cached) = self.cache.get(&key)
            && let CachedStatement::TrialBalance(report) = cached.as_ref()
        {
            return Ok(report.clone());
        }

        let accounts = self.statement_accounts(organization_id, &[]).await?;
        let activity = self.aggregate_activity(organization_id, None, as_of).await?;
        let rows = balance_rows(accounts, &activity);

        let report = StatementService::trial_balance(as_of, currency, rows);
        self.cache
            .insert(key, CachedStatement::TrialBalance(report.clone()));

        Ok(report)
    }

    // ========================================================================
    // Balance Sheet
    // ========================================================================

    /// Generates a balance sheet over asset, liability, and equity
    /// accounts as of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balance_sheet(
        &self,
        organization_id: Uuid,
        as_of: NaiveDate,
        currency: Currency,
    ) -> Result<BalanceSheetReport, StatementRepoError> {
        let key = StatementKey {
            organization_id: OrganizationId::from_uuid(organization_id),
            kind: StatementKind::BalanceSheet,
            period_start: None,
            as_of,
        };

        if let Some(cached) = self.cache.get(&key)
            && let CachedStatement::BalanceSheet(report) = cached.as_ref()
        {
            return Ok(report.clone());
        }

        let accounts = self
            .statement_accounts(
                organization_id,
                &[
                    AccountType::Asset,
                    AccountType::Liability,
                    AccountType::Equity,
                ],
            )
            .await?;
        let activity = self.aggregate_activity(organization_id, None, as_of).await?;
        let rows = balance_rows(accounts, &activity);

        let report = StatementService::balance_sheet(&self.classification, as_of, currency, rows);
        self.cache
            .insert(key, CachedStatement::BalanceSheet(report.clone()));

        Ok(report)
    }

    // ========================================================================
    // Income Statement
    // ========================================================================

    /// Generates an income statement over revenue and expense accounts for
    /// a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is inverted or the database query
    /// fails.
    pub async fn income_statement(
        &self,
        organization_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
        currency: Currency,
    ) -> Result<IncomeStatementReport, StatementRepoError> {
        StatementService::validate_period(period_start, period_end)?;

        let key = StatementKey {
            organization_id: OrganizationId::from_uuid(organization_id),
            kind: StatementKind::IncomeStatement,
            period_start: Some(period_start),
            as_of: period_end,
        };

        if let Some(cached) = self.cache.get(&key)
            && let CachedStatement::IncomeStatement(report) = cached.as_ref()
        {
            return Ok(report.clone());
        }

        let accounts = self
            .statement_accounts(
                organization_id,
                &[AccountType::Revenue, AccountType::Expense],
            )
            .await?;
        let activity = self
            .aggregate_activity(organization_id, Some(period_start), period_end)
            .await?;
        let rows = balance_rows(accounts, &activity);

        let report = StatementService::income_statement(
            &self.classification,
            period_start,
            period_end,
            currency,
            rows,
        );
        self.cache
            .insert(key, CachedStatement::IncomeStatement(report.clone()));

        Ok(report)
    }

    /// Fetches active accounts for a statement, ordered by code. An empty
    /// type list means every type.
    async fn statement_accounts(
        &self,
        organization_id: Uuid,
        types: &[AccountType],
    ) -> Result<Vec<accounts::Model>, StatementRepoError> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::OrganizationId.eq(organization_id))
            .filter(accounts::Column::IsActive.eq(true));

        if !types.is_empty() {
            query = query.filter(accounts::Column::AccountType.is_in(types.iter().cloned()));
        }

        let accounts = query
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;

        Ok(accounts)
    }

    /// Sums every account's debit and credit activity in one pass over the
    /// organization's ledger rows.
    async fn aggregate_activity(
        &self,
        organization_id: Uuid,
        from: Option<NaiveDate>,
        to: NaiveDate,
    ) -> Result<HashMap<Uuid, (Decimal, Decimal)>, StatementRepoError> {
        let mut query = general_ledger_entries::Entity::find()
            .select_only()
            .column(general_ledger_entries::Column::AccountId)
            .column(general_ledger_entries::Column::DebitAmount)
            .column(general_ledger_entries::Column::CreditAmount)
            .filter(general_ledger_entries::Column::OrganizationId.eq(organization_id))
            .filter(general_ledger_entries::Column::EntryDate.lte(to));

        if let Some(from) = from {
            query = query.filter(general_ledger_entries::Column::EntryDate.gte(from));
        }

        let rows: Vec<(Uuid, Decimal, Decimal)> = query.into_tuple().all(&self.db).await?;

        Ok(sum_activity(rows))
    }
}

// ============================================================================
// Aggregation Helpers
// ============================================================================

/// Folds raw (account, debit, credit) rows into per-account totals.
fn sum_activity(rows: Vec<(Uuid, Decimal, Decimal)>) -> HashMap<Uuid, (Decimal, Decimal)> {
    let mut totals: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();

    for (account_id, debit, credit) in rows {
        let entry = totals
            .entry(account_id)
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 += debit;
        entry.1 += credit;
    }

    totals
}

/// Joins accounts to their summed activity. Accounts with no ledger rows
/// appear with zero totals rather than being dropped.
fn balance_rows(
    accounts: Vec<accounts::Model>,
    activity: &HashMap<Uuid, (Decimal, Decimal)>,
) -> Vec<AccountBalance> {
    accounts
        .into_iter()
        .map(|account| {
            let (total_debit, total_credit) = activity
                .get(&account.id)
                .copied()
                .unwrap_or((Decimal::ZERO, Decimal::ZERO));

            AccountBalance::compute(
                account.id,
                account.code,
                account.name,
                account.account_type.into(),
                total_debit,
                total_credit,
            )
        })
        .collect()
}
