//! Financial statement generation.

use chrono::NaiveDate;
use folio_shared::types::Currency;
use rust_decimal::Decimal;

use super::classification::{BalanceSheetGroup, IncomeStatementGroup, StatementClassification};
use super::error::StatementError;
use super::types::{
    AccountBalance, BalanceSheetReport, BalanceSheetSection, BalanceSheetSubsection,
    IncomeStatementReport, IncomeStatementSection, TrialBalanceReport, TrialBalanceTotals,
};
use crate::account::code_number;

/// Service for generating financial statements.
///
/// All builders are pure: they take pre-aggregated account balances and
/// never touch storage. When the inputs come from a ledger whose entries
/// all balance, the trial balance totals match exactly; when they do not,
/// the reports surface the discrepancy instead of failing.
pub struct StatementService;

impl StatementService {
    /// Validates an income statement period.
    pub fn validate_period(start: NaiveDate, end: NaiveDate) -> Result<(), StatementError> {
        if start > end {
            return Err(StatementError::InvalidDateRange { start, end });
        }
        Ok(())
    }

    /// Generates a trial balance report from account balances.
    ///
    /// Each account's net balance lands in the debit or credit column
    /// according to its normal balance; negative balances move to the
    /// opposite column. The report is balanced only when the column
    /// totals are exactly equal.
    #[must_use]
    pub fn trial_balance(
        as_of: NaiveDate,
        currency: Currency,
        mut accounts: Vec<AccountBalance>,
    ) -> TrialBalanceReport {
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let total_debits: Decimal = accounts.iter().map(AccountBalance::debit_column).sum();
        let total_credits: Decimal = accounts.iter().map(AccountBalance::credit_column).sum();
        let difference = total_debits - total_credits;

        TrialBalanceReport {
            report_type: "trial_balance".to_string(),
            as_of,
            currency,
            accounts,
            totals: TrialBalanceTotals {
                total_debits,
                total_credits,
                difference,
                is_balanced: difference == Decimal::ZERO,
            },
        }
    }

    /// Generates a balance sheet report from account balances.
    ///
    /// Assets and liabilities split into current and non-current
    /// subsections by account-code range. Revenue and expense accounts
    /// are ignored.
    #[must_use]
    pub fn balance_sheet(
        classification: &StatementClassification,
        as_of: NaiveDate,
        currency: Currency,
        mut accounts: Vec<AccountBalance>,
    ) -> BalanceSheetReport {
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let mut current_assets = Vec::new();
        let mut non_current_assets = Vec::new();
        let mut current_liabilities = Vec::new();
        let mut non_current_liabilities = Vec::new();
        let mut equity_accounts = Vec::new();

        for account in accounts {
            let code = code_number(&account.code).unwrap_or(u32::MAX);
            match classification.balance_sheet_group(account.account_type, code) {
                Some(BalanceSheetGroup::CurrentAsset) => current_assets.push(account),
                Some(BalanceSheetGroup::NonCurrentAsset) => non_current_assets.push(account),
                Some(BalanceSheetGroup::CurrentLiability) => current_liabilities.push(account),
                Some(BalanceSheetGroup::NonCurrentLiability) => {
                    non_current_liabilities.push(account);
                }
                Some(BalanceSheetGroup::Equity) => equity_accounts.push(account),
                None => {}
            }
        }

        let assets = Self::section_from_subsections(vec![
            Self::subsection(BalanceSheetGroup::CurrentAsset, current_assets),
            Self::subsection(BalanceSheetGroup::NonCurrentAsset, non_current_assets),
        ]);
        let liabilities = Self::section_from_subsections(vec![
            Self::subsection(BalanceSheetGroup::CurrentLiability, current_liabilities),
            Self::subsection(BalanceSheetGroup::NonCurrentLiability, non_current_liabilities),
        ]);
        let equity = BalanceSheetSection {
            total: equity_accounts.iter().map(|a| a.balance).sum(),
            accounts: equity_accounts,
            subsections: Vec::new(),
        };

        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity = equity.total;
        let liabilities_and_equity = total_liabilities + total_equity;
        let difference = total_assets - liabilities_and_equity;

        BalanceSheetReport {
            report_type: "balance_sheet".to_string(),
            as_of,
            currency,
            assets,
            liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity,
            liabilities_and_equity,
            difference,
            is_balanced: difference == Decimal::ZERO,
        }
    }

    /// Generates an income statement report from account balances.
    ///
    /// Revenue and expense accounts split into operating and
    /// non-operating sections by account-code range; the COGS expense
    /// range feeds gross profit. Section totals are signed, so contra
    /// accounts reduce their section. Balance sheet accounts are ignored.
    #[must_use]
    pub fn income_statement(
        classification: &StatementClassification,
        period_start: NaiveDate,
        period_end: NaiveDate,
        currency: Currency,
        mut accounts: Vec<AccountBalance>,
    ) -> IncomeStatementReport {
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let mut revenue = IncomeStatementSection::default();
        let mut other_income = IncomeStatementSection::default();
        let mut cogs = IncomeStatementSection::default();
        let mut operating_expenses = IncomeStatementSection::default();
        let mut other_expenses = IncomeStatementSection::default();

        for account in accounts {
            let code = code_number(&account.code).unwrap_or(u32::MAX);
            match classification.income_statement_group(account.account_type, code) {
                Some(IncomeStatementGroup::OperatingRevenue) => {
                    Self::add_to_income_section(&mut revenue, account);
                }
                Some(IncomeStatementGroup::OtherIncome) => {
                    Self::add_to_income_section(&mut other_income, account);
                }
                Some(IncomeStatementGroup::CostOfGoodsSold) => {
                    Self::add_to_income_section(&mut cogs, account);
                }
                Some(IncomeStatementGroup::OperatingExpense) => {
                    Self::add_to_income_section(&mut operating_expenses, account);
                }
                Some(IncomeStatementGroup::OtherExpense) => {
                    Self::add_to_income_section(&mut other_expenses, account);
                }
                None => {}
            }
        }

        let gross_profit = revenue.total - cogs.total;
        let operating_income = gross_profit - operating_expenses.total;
        let net_income = operating_income + other_income.total - other_expenses.total;

        IncomeStatementReport {
            report_type: "income_statement".to_string(),
            period_start,
            period_end,
            currency,
            revenue,
            other_income,
            cost_of_goods_sold: cogs,
            gross_profit,
            operating_expenses,
            operating_income,
            other_expenses,
            net_income,
        }
    }

    fn subsection(group: BalanceSheetGroup, accounts: Vec<AccountBalance>) -> BalanceSheetSubsection {
        let total = accounts.iter().map(|a| a.balance).sum();
        BalanceSheetSubsection {
            name: group.label().to_string(),
            total,
            accounts,
        }
    }

    fn section_from_subsections(subsections: Vec<BalanceSheetSubsection>) -> BalanceSheetSection {
        let total = subsections.iter().map(|s| s.total).sum();
        let accounts = subsections
            .iter()
            .flat_map(|s| s.accounts.iter())
            .cloned()
            .collect();
        BalanceSheetSection {
            total,
            accounts,
            subsections,
        }
    }

    fn add_to_income_section(section: &mut IncomeStatementSection, account: AccountBalance) {
        section.total += account.balance;
        section.accounts.push(account);
    }
}
