//! Account repository for chart of accounts database operations.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use folio_core::account::{
    build_tree, validate_code, validate_normal_balance, validate_parent, AccountNode,
    AccountSummary, AccountType, NormalBalance, ParentAccount, ParentLink,
};
use folio_shared::types::{Currency, PageRequest, PageResponse};

use crate::entities::{accounts, general_ledger_entries};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountRepoError {
    /// Account rule violated (code format, normal balance, hierarchy).
    #[error("{0}")]
    Rule(#[from] folio_core::account::AccountError),

    /// Account code already exists in organization.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(Uuid),

    /// Parent account belongs to different organization.
    #[error("Parent account belongs to different organization")]
    ParentWrongOrganization,

    /// Parent account is deactivated.
    #[error("Parent account is not active: {0}")]
    ParentInactive(Uuid),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// System accounts cannot be modified or deactivated.
    #[error("Account {0} is a system account and cannot be changed")]
    SystemAccount(Uuid),

    /// Cannot deactivate an account that has ledger history.
    #[error("Cannot deactivate account: it has {0} ledger entries")]
    HasLedgerHistory(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Organization ID.
    pub organization_id: Uuid,
    /// Account code (four digits, unique within organization).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account description.
    pub description: Option<String>,
    /// Account type (asset, liability, equity, revenue, expense).
    pub account_type: AccountType,
    /// Normal balance; derived from the account type when omitted.
    pub normal_balance: Option<NormalBalance>,
    /// Parent account ID for hierarchical structure.
    pub parent_id: Option<Uuid>,
    /// Account currency.
    pub currency: Currency,
    /// Whether this is a protected system account.
    pub is_system: bool,
}

/// Input for updating an account.
///
/// Code, type, and normal balance are immutable once an account exists;
/// activation changes go through [`AccountRepository::deactivate_account`].
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Account name.
    pub name: Option<String>,
    /// Account description.
    pub description: Option<Option<String>>,
    /// Parent account ID.
    pub parent_id: Option<Option<Uuid>>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
    /// Filter by code prefix (for example "1" for assets).
    pub code_prefix: Option<String>,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The code is not four digits
    /// - A declared normal balance contradicts the account type
    /// - The code already exists in the organization
    /// - The parent is missing, inactive, of a different type, or in another
    ///   organization
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountRepoError> {
        validate_code(&input.code)?;
        let normal_balance = validate_normal_balance(input.account_type, input.normal_balance)?;

        // Validate unique code within organization
        let existing = accounts::Entity::find()
            .filter(accounts::Column::OrganizationId.eq(input.organization_id))
            .filter(accounts::Column::Code.eq(&input.code))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(AccountRepoError::DuplicateCode(input.code));
        }

        let id = Uuid::new_v4();

        // Validate parent account if provided
        if let Some(parent_id) = input.parent_id {
            let parent = self
                .require_parent(input.organization_id, parent_id)
                .await?;
            let links = self.parent_links(input.organization_id).await?;
            validate_parent(
                id,
                input.account_type,
                ParentAccount {
                    id: parent.id,
                    account_type: parent.account_type.into(),
                },
                &links,
            )?;
        }

        let now = chrono::Utc::now().into();
        let code = input.code.clone();
        let account = accounts::ActiveModel {
            id: Set(id),
            organization_id: Set(input.organization_id),
            code: Set(input.code),
            name: Set(input.name),
            description: Set(input.description),
            account_type: Set(input.account_type.into()),
            normal_balance: Set(normal_balance.into()),
            parent_id: Set(input.parent_id),
            currency: Set(input.currency.to_string()),
            is_active: Set(true),
            is_system: Set(input.is_system),
            current_balance: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // The unique index backstops the pre-check under concurrent creates.
        match account.insert(&self.db).await {
            Ok(model) => Ok(model),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AccountRepoError::DuplicateCode(code))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Finds an account by ID within an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_account_by_id(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<accounts::Model>, AccountRepoError> {
        let account = accounts::Entity::find_by_id(id)
            .filter(accounts::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?;

        Ok(account)
    }

    /// Finds an account by code within an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_account_by_code(
        &self,
        organization_id: Uuid,
        code: &str,
    ) -> Result<Option<accounts::Model>, AccountRepoError> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::OrganizationId.eq(organization_id))
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await?;

        Ok(account)
    }

    /// Lists accounts for an organization, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        organization_id: Uuid,
        filter: AccountFilter,
        page: PageRequest,
    ) -> Result<PageResponse<accounts::Model>, AccountRepoError> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::OrganizationId.eq(organization_id));

        if let Some(account_type) = filter.account_type {
            let db_type: crate::entities::sea_orm_active_enums::AccountType = account_type.into();
            query = query.filter(accounts::Column::AccountType.eq(db_type));
        }

        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }

        if let Some(prefix) = filter.code_prefix {
            query = query.filter(accounts::Column::Code.starts_with(&prefix));
        }

        let page = page.sanitized();
        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_asc(accounts::Column::Code)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Updates an account's name, description, or parent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Account not found in the organization
    /// - Account is a system account
    /// - The new parent is invalid or would create a cycle
    pub async fn update_account(
        &self,
        organization_id: Uuid,
        id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountRepoError> {
        let account = self.require_account(organization_id, id).await?;

        if account.is_system {
            return Err(AccountRepoError::SystemAccount(id));
        }

        // Validate parent change before touching the row
        if let Some(Some(parent_id)) = input.parent_id {
            let account_type: AccountType = account.account_type.clone().into();
            let parent = self.require_parent(organization_id, parent_id).await?;
            let links = self.parent_links(organization_id).await?;
            validate_parent(
                id,
                account_type,
                ParentAccount {
                    id: parent.id,
                    account_type: parent.account_type.into(),
                },
                &links,
            )?;
        }

        let now = chrono::Utc::now().into();
        let mut active: accounts::ActiveModel = account.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(parent_id) = input.parent_id {
            active.parent_id = Set(parent_id);
        }
        active.updated_at = Set(now);

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deactivates an account (soft delete).
    ///
    /// Accounts are never hard-deleted: any account that has posted ledger
    /// history must stay resolvable for statements and audits.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Account not found in the organization
    /// - Account is a system account
    /// - Account has general ledger entries
    pub async fn deactivate_account(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<(), AccountRepoError> {
        let account = self.require_account(organization_id, id).await?;

        if account.is_system {
            return Err(AccountRepoError::SystemAccount(id));
        }

        let ledger_rows = self.count_ledger_rows(id).await?;
        if ledger_rows > 0 {
            return Err(AccountRepoError::HasLedgerHistory(ledger_rows));
        }

        let now = chrono::Utc::now().into();
        let mut active: accounts::ActiveModel = account.into();
        active.is_active = Set(false);
        active.updated_at = Set(now);
        active.update(&self.db).await?;

        Ok(())
    }

    /// Builds the account hierarchy tree for an organization.
    ///
    /// Only active accounts appear; children of filtered-out parents are
    /// promoted to roots rather than dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn account_hierarchy(
        &self,
        organization_id: Uuid,
        account_type: Option<AccountType>,
    ) -> Result<Vec<AccountNode>, AccountRepoError> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::OrganizationId.eq(organization_id))
            .filter(accounts::Column::IsActive.eq(true));

        if let Some(account_type) = account_type {
            let db_type: crate::entities::sea_orm_active_enums::AccountType = account_type.into();
            query = query.filter(accounts::Column::AccountType.eq(db_type));
        }

        let accounts = query
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;

        let summaries = accounts
            .into_iter()
            .map(|account| AccountSummary {
                id: account.id,
                code: account.code,
                name: account.name,
                account_type: account.account_type.into(),
                parent_id: account.parent_id,
                is_active: account.is_active,
                current_balance: account.current_balance,
            })
            .collect();

        Ok(build_tree(summaries))
    }

    /// Fetches an account or fails with `AccountNotFound`.
    async fn require_account(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<accounts::Model, AccountRepoError> {
        self.find_account_by_id(organization_id, id)
            .await?
            .ok_or(AccountRepoError::AccountNotFound(id))
    }

    /// Fetches and vets a parent candidate.
    async fn require_parent(
        &self,
        organization_id: Uuid,
        parent_id: Uuid,
    ) -> Result<accounts::Model, AccountRepoError> {
        let parent = accounts::Entity::find_by_id(parent_id)
            .one(&self.db)
            .await?
            .ok_or(AccountRepoError::ParentNotFound(parent_id))?;

        if parent.organization_id != organization_id {
            return Err(AccountRepoError::ParentWrongOrganization);
        }
        if !parent.is_active {
            return Err(AccountRepoError::ParentInactive(parent_id));
        }

        Ok(parent)
    }

    /// Loads the parent pointers of every account in the organization for
    /// cycle checks.
    async fn parent_links(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<ParentLink>, AccountRepoError> {
        let rows: Vec<(Uuid, Option<Uuid>)> = accounts::Entity::find()
            .select_only()
            .column(accounts::Column::Id)
            .column(accounts::Column::ParentId)
            .filter(accounts::Column::OrganizationId.eq(organization_id))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, parent_id)| ParentLink { id, parent_id })
            .collect())
    }

    /// Counts general ledger entries for an account.
    async fn count_ledger_rows(&self, account_id: Uuid) -> Result<u64, AccountRepoError> {
        let count = general_ledger_entries::Entity::find()
            .filter(general_ledger_entries::Column::AccountId.eq(account_id))
            .count(&self.db)
            .await?;

        Ok(count)
    }
}
