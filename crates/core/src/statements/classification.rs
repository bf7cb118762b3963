//! Statement section classification.
//!
//! Accounts are assigned to statement sections by account type and by the
//! numeric range their code falls in: low asset codes are current assets,
//! the 5000-5099 expense block is cost of goods sold, and so on. The
//! thresholds are configurable per deployment; the defaults follow a
//! conventional small-business chart of accounts.

use folio_shared::config::StatementsConfig;
use serde::{Deserialize, Serialize};

use crate::account::AccountType;

/// Balance sheet placement for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceSheetGroup {
    /// Asset expected to convert to cash within a year.
    CurrentAsset,
    /// Long-lived asset.
    NonCurrentAsset,
    /// Obligation due within a year.
    CurrentLiability,
    /// Long-term obligation.
    NonCurrentLiability,
    /// Owners' equity.
    Equity,
}

impl BalanceSheetGroup {
    /// Returns the subsection label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CurrentAsset => "current_assets",
            Self::NonCurrentAsset => "non_current_assets",
            Self::CurrentLiability => "current_liabilities",
            Self::NonCurrentLiability => "non_current_liabilities",
            Self::Equity => "equity",
        }
    }
}

/// Income statement placement for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeStatementGroup {
    /// Revenue from ordinary operations.
    OperatingRevenue,
    /// Revenue outside ordinary operations.
    OtherIncome,
    /// Direct cost of goods or services sold.
    CostOfGoodsSold,
    /// Expense of ordinary operations.
    OperatingExpense,
    /// Expense outside ordinary operations.
    OtherExpense,
}

/// Account-code ranges that partition statement sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementClassification {
    /// Asset codes at or below this are current assets.
    pub current_asset_code_max: u32,
    /// Liability codes at or below this are current liabilities.
    pub current_liability_code_max: u32,
    /// Revenue codes at or below this are operating revenue.
    pub operating_revenue_code_max: u32,
    /// Start of the cost-of-goods-sold expense range (inclusive).
    pub cogs_code_min: u32,
    /// End of the cost-of-goods-sold expense range (inclusive).
    pub cogs_code_max: u32,
    /// Expense codes above the COGS range and at or below this are
    /// operating expenses.
    pub operating_expense_code_max: u32,
}

impl Default for StatementClassification {
    fn default() -> Self {
        Self {
            current_asset_code_max: 1499,
            current_liability_code_max: 2499,
            operating_revenue_code_max: 4899,
            cogs_code_min: 5000,
            cogs_code_max: 5099,
            operating_expense_code_max: 5899,
        }
    }
}

impl From<&StatementsConfig> for StatementClassification {
    fn from(config: &StatementsConfig) -> Self {
        Self {
            current_asset_code_max: config.current_asset_code_max,
            current_liability_code_max: config.current_liability_code_max,
            operating_revenue_code_max: config.operating_revenue_code_max,
            cogs_code_min: config.cogs_code_min,
            cogs_code_max: config.cogs_code_max,
            operating_expense_code_max: config.operating_expense_code_max,
        }
    }
}

impl StatementClassification {
    /// Places an account on the balance sheet.
    ///
    /// Returns `None` for income statement account types.
    #[must_use]
    pub fn balance_sheet_group(
        &self,
        account_type: AccountType,
        code: u32,
    ) -> Option<BalanceSheetGroup> {
        match account_type {
            AccountType::Asset => Some(if code <= self.current_asset_code_max {
                BalanceSheetGroup::CurrentAsset
            } else {
                BalanceSheetGroup::NonCurrentAsset
            }),
            AccountType::Liability => Some(if code <= self.current_liability_code_max {
                BalanceSheetGroup::CurrentLiability
            } else {
                BalanceSheetGroup::NonCurrentLiability
            }),
            AccountType::Equity => Some(BalanceSheetGroup::Equity),
            AccountType::Revenue | AccountType::Expense => None,
        }
    }

    /// Places an account on the income statement.
    ///
    /// Returns `None` for balance sheet account types.
    #[must_use]
    pub fn income_statement_group(
        &self,
        account_type: AccountType,
        code: u32,
    ) -> Option<IncomeStatementGroup> {
        match account_type {
            AccountType::Revenue => Some(if code <= self.operating_revenue_code_max {
                IncomeStatementGroup::OperatingRevenue
            } else {
                IncomeStatementGroup::OtherIncome
            }),
            AccountType::Expense => {
                Some(if (self.cogs_code_min..=self.cogs_code_max).contains(&code) {
                    IncomeStatementGroup::CostOfGoodsSold
                } else if code <= self.operating_expense_code_max {
                    IncomeStatementGroup::OperatingExpense
                } else {
                    IncomeStatementGroup::OtherExpense
                })
            }
            AccountType::Asset | AccountType::Liability | AccountType::Equity => None,
        }
    }
}
