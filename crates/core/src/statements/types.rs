//! Financial statement data types.

use chrono::NaiveDate;
use folio_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::{AccountType, NormalBalance};

/// Aggregated account balance for statements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Net balance in the account's normal-balance direction.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Builds an account balance, deriving the net balance from the
    /// account type's normal balance.
    #[must_use]
    pub fn compute(
        account_id: Uuid,
        code: String,
        name: String,
        account_type: AccountType,
        total_debit: Decimal,
        total_credit: Decimal,
    ) -> Self {
        let balance = account_type
            .normal_balance()
            .balance_change(total_debit, total_credit);
        Self {
            account_id,
            code,
            name,
            account_type,
            total_debit,
            total_credit,
            balance,
        }
    }

    /// Net balance shown in the trial balance debit column.
    ///
    /// A negative balance moves to the opposite column, so exactly one of
    /// the two columns is non-zero for any account with activity.
    #[must_use]
    pub fn debit_column(&self) -> Decimal {
        match self.account_type.normal_balance() {
            NormalBalance::Debit => self.balance.max(Decimal::ZERO),
            NormalBalance::Credit => (-self.balance).max(Decimal::ZERO),
        }
    }

    /// Net balance shown in the trial balance credit column.
    #[must_use]
    pub fn credit_column(&self) -> Decimal {
        match self.account_type.normal_balance() {
            NormalBalance::Debit => (-self.balance).max(Decimal::ZERO),
            NormalBalance::Credit => self.balance.max(Decimal::ZERO),
        }
    }
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Report type identifier.
    pub report_type: String,
    /// As of date.
    pub as_of: NaiveDate,
    /// Currency code.
    pub currency: Currency,
    /// Account balances, ordered by code.
    pub accounts: Vec<AccountBalance>,
    /// Totals.
    pub totals: TrialBalanceTotals,
}

/// Trial balance totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Sum of the debit column.
    pub total_debits: Decimal,
    /// Sum of the credit column.
    pub total_credits: Decimal,
    /// Debit column minus credit column; zero when balanced.
    pub difference: Decimal,
    /// Whether debits exactly equal credits.
    pub is_balanced: bool,
}

/// Balance sheet section (assets, liabilities, equity).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSheetSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section, ordered by code.
    pub accounts: Vec<AccountBalance>,
    /// Subsections (current vs non-current).
    pub subsections: Vec<BalanceSheetSubsection>,
}

/// Balance sheet subsection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetSubsection {
    /// Subsection name.
    pub name: String,
    /// Subsection total.
    pub total: Decimal,
    /// Accounts in this subsection.
    pub accounts: Vec<AccountBalance>,
}

/// Balance sheet report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Report type identifier.
    pub report_type: String,
    /// As of date.
    pub as_of: NaiveDate,
    /// Currency code.
    pub currency: Currency,
    /// Assets section.
    pub assets: BalanceSheetSection,
    /// Liabilities section.
    pub liabilities: BalanceSheetSection,
    /// Equity section.
    pub equity: BalanceSheetSection,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Decimal,
    /// Assets minus liabilities and equity; zero when balanced.
    pub difference: Decimal,
    /// Whether assets exactly equal liabilities plus equity.
    pub is_balanced: bool,
}

/// Income statement section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeStatementSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section, ordered by code.
    pub accounts: Vec<AccountBalance>,
}

/// Income statement report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Report type identifier.
    pub report_type: String,
    /// Period start date.
    pub period_start: NaiveDate,
    /// Period end date.
    pub period_end: NaiveDate,
    /// Currency code.
    pub currency: Currency,
    /// Operating revenue section.
    pub revenue: IncomeStatementSection,
    /// Non-operating income section.
    pub other_income: IncomeStatementSection,
    /// Cost of goods sold section.
    pub cost_of_goods_sold: IncomeStatementSection,
    /// Gross profit (revenue - COGS).
    pub gross_profit: Decimal,
    /// Operating expenses section.
    pub operating_expenses: IncomeStatementSection,
    /// Operating income (gross profit - operating expenses).
    pub operating_income: Decimal,
    /// Non-operating expenses section.
    pub other_expenses: IncomeStatementSection,
    /// Net income (operating income + other income - other expenses).
    pub net_income: Decimal,
}
