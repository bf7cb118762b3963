//! Financial statement caching using Moka.
//!
//! Statement reads aggregate the whole general ledger for an organization,
//! so repeated requests for the same period are served from an in-memory
//! cache. Posting, retracting, or reversing an entry invalidates every
//! cached statement for the affected organization.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use folio_core::statements::{BalanceSheetReport, IncomeStatementReport, TrialBalanceReport};
use folio_shared::config::StatementsConfig;
use folio_shared::types::OrganizationId;
use moka::sync::Cache;
use tracing::warn;

/// Default cache capacity (number of statements).
const DEFAULT_CACHE_CAPACITY: u64 = 256;

/// Default time-to-live for cached statements (1 minute).
const DEFAULT_TTL_SECS: u64 = 60;

/// Which statement a cache entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// Trial balance as of a date.
    TrialBalance,
    /// Balance sheet as of a date.
    BalanceSheet,
    /// Income statement over a period.
    IncomeStatement,
}

/// Cache key: one statement for one organization and period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatementKey {
    /// Organization the statement belongs to.
    pub organization_id: OrganizationId,
    /// Statement type.
    pub kind: StatementKind,
    /// Period start for range statements; `None` for as-of statements.
    pub period_start: Option<NaiveDate>,
    /// As-of date (period end for range statements).
    pub as_of: NaiveDate,
}

/// A cached statement of any kind.
#[derive(Debug, Clone)]
pub enum CachedStatement {
    /// Cached trial balance.
    TrialBalance(TrialBalanceReport),
    /// Cached balance sheet.
    BalanceSheet(BalanceSheetReport),
    /// Cached income statement.
    IncomeStatement(IncomeStatementReport),
}

/// Cache for generated financial statements.
///
/// Keys carry the organization so a posting in one organization never
/// evicts statements of another. Thread-safe and cheap to clone.
#[derive(Clone)]
pub struct StatementCache {
    cache: Cache<StatementKey, Arc<CachedStatement>>,
}

impl StatementCache {
    /// Creates a new statement cache with default settings.
    ///
    /// Default: 256 statements max, 1 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a new statement cache with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of statements to cache
    /// * `ttl_secs` - Time-to-live in seconds for each statement
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .support_invalidation_closures()
            .build();

        Self { cache }
    }

    /// Creates a statement cache sized from the statements configuration.
    #[must_use]
    pub fn from_config(config: &StatementsConfig) -> Self {
        Self::with_config(config.cache_capacity, config.cache_ttl_secs)
    }

    /// Looks up a cached statement.
    #[must_use]
    pub fn get(&self, key: &StatementKey) -> Option<Arc<CachedStatement>> {
        self.cache.get(key)
    }

    /// Stores a freshly generated statement.
    pub fn insert(&self, key: StatementKey, statement: CachedStatement) {
        self.cache.insert(key, Arc::new(statement));
    }

    /// Invalidates every cached statement for one organization.
    ///
    /// Called after any ledger mutation (post, retract, reverse) so stale
    /// statements are never served.
    pub fn invalidate_organization(&self, organization_id: OrganizationId) {
        let result = self
            .cache
            .invalidate_entries_if(move |key, _| key.organization_id == organization_id);
        if let Err(e) = result {
            warn!(error = %e, "Statement cache invalidation failed, flushing all entries");
            self.cache.invalidate_all();
        }
    }

    /// Invalidates all cached statements.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Returns the number of statements currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks.
    ///
    /// Moka handles expiry in the background, but calling this explicitly
    /// makes `entry_count` accurate after invalidation.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl Default for StatementCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StatementCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementCache")
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::statements::StatementService;
    use folio_shared::types::Currency;

    fn trial_balance_key(org: OrganizationId) -> StatementKey {
        StatementKey {
            organization_id: org,
            kind: StatementKind::TrialBalance,
            period_start: None,
            as_of: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
        }
    }

    fn empty_trial_balance() -> CachedStatement {
        let report = StatementService::trial_balance(
            NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
            Currency::Usd,
            vec![],
        );
        CachedStatement::TrialBalance(report)
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let cache = StatementCache::new();
        let org = OrganizationId::new();
        let key = trial_balance_key(org);

        assert!(cache.get(&key).is_none(), "fresh cache should miss");

        cache.insert(key, empty_trial_balance());
        assert!(cache.get(&key).is_some(), "should hit after insert");
    }

    #[test]
    fn test_invalidate_organization_is_scoped() {
        let cache = StatementCache::new();
        let org_a = OrganizationId::new();
        let org_b = OrganizationId::new();

        cache.insert(trial_balance_key(org_a), empty_trial_balance());
        cache.insert(trial_balance_key(org_b), empty_trial_balance());

        cache.invalidate_organization(org_a);
        cache.run_pending_tasks();

        assert!(
            cache.get(&trial_balance_key(org_a)).is_none(),
            "invalidated organization should miss"
        );
        assert!(
            cache.get(&trial_balance_key(org_b)).is_some(),
            "other organization should still hit"
        );
    }

    #[test]
    fn test_keys_distinguish_kind_and_period() {
        let cache = StatementCache::new();
        let org = OrganizationId::new();

        let tb_key = trial_balance_key(org);
        let bs_key = StatementKey {
            kind: StatementKind::BalanceSheet,
            ..tb_key
        };

        cache.insert(tb_key, empty_trial_balance());
        assert!(cache.get(&bs_key).is_none(), "kind is part of the key");

        let later_key = StatementKey {
            as_of: NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
            ..tb_key
        };
        assert!(cache.get(&later_key).is_none(), "as-of date is part of the key");
    }

    #[test]
    fn test_invalidate_all() {
        let cache = StatementCache::new();
        let org = OrganizationId::new();
        let key = trial_balance_key(org);

        cache.insert(key, empty_trial_balance());
        cache.invalidate_all();
        cache.run_pending_tasks();

        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_from_config_uses_configured_limits() {
        let config = StatementsConfig::default();
        let cache = StatementCache::from_config(&config);
        assert_eq!(cache.entry_count(), 0);
    }
}
