//! Property-based tests for the statements module.

use chrono::NaiveDate;
use folio_shared::types::Currency;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::classification::StatementClassification;
use super::service::StatementService;
use super::types::AccountBalance;
use crate::account::AccountType;

fn balance(
    code: &str,
    account_type: AccountType,
    total_debit: Decimal,
    total_credit: Decimal,
) -> AccountBalance {
    AccountBalance::compute(
        Uuid::new_v4(),
        code.to_string(),
        format!("Account {code}"),
        account_type,
        total_debit,
        total_credit,
    )
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()
}

proptest! {
    /// For any set of accounts whose raw debit and credit activity sums
    /// to the same total, the trial balance columns are exactly equal,
    /// whatever mix of account types and negative balances is involved.
    #[test]
    fn test_trial_balance_balanced_for_balanced_ledger(
        activity in prop::collection::vec(
            (0usize..5, 0i64..1_000_000_000, 0i64..1_000_000_000),
            1..15,
        ),
    ) {
        let mut accounts = Vec::with_capacity(activity.len() + 1);
        let mut raw_debits = Decimal::ZERO;
        let mut raw_credits = Decimal::ZERO;

        for (i, (type_idx, debit_cents, credit_cents)) in activity.iter().enumerate() {
            let debit = Decimal::new(*debit_cents, 2);
            let credit = Decimal::new(*credit_cents, 2);
            raw_debits += debit;
            raw_credits += credit;
            accounts.push(balance(
                &format!("{}", 1000 + i),
                AccountType::ALL[*type_idx],
                debit,
                credit,
            ));
        }

        // Balancing account so the ledger as a whole satisfies
        // total debits == total credits.
        let diff = raw_debits - raw_credits;
        let (final_debit, final_credit) = if diff >= Decimal::ZERO {
            (Decimal::ZERO, diff)
        } else {
            (-diff, Decimal::ZERO)
        };
        accounts.push(balance("9999", AccountType::Equity, final_debit, final_credit));

        let report = StatementService::trial_balance(as_of(), Currency::Usd, accounts);

        prop_assert!(report.totals.is_balanced, "columns differ: {:?}", report.totals);
        prop_assert_eq!(report.totals.total_debits, report.totals.total_credits);
        prop_assert_eq!(report.totals.difference, Decimal::ZERO);
    }

    /// An account's net balance lands in exactly one trial balance
    /// column, and the column amount is the absolute net balance.
    #[test]
    fn test_trial_balance_column_exclusivity(
        type_idx in 0usize..5,
        debit_cents in 0i64..1_000_000_000,
        credit_cents in 0i64..1_000_000_000,
    ) {
        let account = balance(
            "1100",
            AccountType::ALL[type_idx],
            Decimal::new(debit_cents, 2),
            Decimal::new(credit_cents, 2),
        );

        let debit_column = account.debit_column();
        let credit_column = account.credit_column();

        prop_assert!(
            debit_column == Decimal::ZERO || credit_column == Decimal::ZERO,
            "both columns non-zero: {debit_column} / {credit_column}"
        );
        prop_assert_eq!(debit_column + credit_column, account.balance.abs());
    }

    /// An unbalanced ledger is reported, not hidden: the difference
    /// field carries the exact column discrepancy.
    #[test]
    fn test_trial_balance_difference_reports_imbalance(
        activity in prop::collection::vec(
            (0usize..5, 0i64..1_000_000_000, 0i64..1_000_000_000),
            1..15,
        ),
    ) {
        let accounts: Vec<AccountBalance> = activity
            .iter()
            .enumerate()
            .map(|(i, (type_idx, debit_cents, credit_cents))| {
                balance(
                    &format!("{}", 1000 + i),
                    AccountType::ALL[*type_idx],
                    Decimal::new(*debit_cents, 2),
                    Decimal::new(*credit_cents, 2),
                )
            })
            .collect();

        let report = StatementService::trial_balance(as_of(), Currency::Usd, accounts);

        prop_assert_eq!(
            report.totals.difference,
            report.totals.total_debits - report.totals.total_credits
        );
        prop_assert_eq!(
            report.totals.is_balanced,
            report.totals.difference == Decimal::ZERO
        );
    }

    /// Assets equal liabilities plus equity whenever the inputs satisfy
    /// the accounting equation.
    #[test]
    fn test_balance_sheet_equation(
        asset_cents in 0i64..1_000_000_000,
        liability_cents in 0i64..500_000_000,
    ) {
        let assets = Decimal::new(asset_cents, 2);
        let liabilities = Decimal::new(liability_cents, 2);
        let equity = assets - liabilities;
        let (equity_debit, equity_credit) = if equity >= Decimal::ZERO {
            (Decimal::ZERO, equity)
        } else {
            (-equity, Decimal::ZERO)
        };

        let accounts = vec![
            balance("1100", AccountType::Asset, assets, Decimal::ZERO),
            balance("2100", AccountType::Liability, Decimal::ZERO, liabilities),
            balance("3100", AccountType::Equity, equity_debit, equity_credit),
        ];

        let report = StatementService::balance_sheet(
            &StatementClassification::default(),
            as_of(),
            Currency::Usd,
            accounts,
        );

        prop_assert!(report.is_balanced);
        prop_assert_eq!(report.total_assets, report.liabilities_and_equity);
        prop_assert_eq!(report.difference, Decimal::ZERO);
        prop_assert_eq!(
            report.total_assets,
            report.total_liabilities + report.total_equity
        );
    }

    /// Current and non-current subsections partition the asset section:
    /// their totals sum to the section total and every account appears
    /// in exactly one subsection.
    #[test]
    fn test_balance_sheet_subsection_partition(
        current in prop::collection::vec(1i64..100_000_000, 1..6),
        non_current in prop::collection::vec(1i64..100_000_000, 1..6),
    ) {
        let mut accounts = Vec::new();
        let mut expected_current = Decimal::ZERO;
        let mut expected_non_current = Decimal::ZERO;

        for (i, cents) in current.iter().enumerate() {
            let amount = Decimal::new(*cents, 2);
            expected_current += amount;
            accounts.push(balance(
                &format!("{}", 1100 + i),
                AccountType::Asset,
                amount,
                Decimal::ZERO,
            ));
        }
        for (i, cents) in non_current.iter().enumerate() {
            let amount = Decimal::new(*cents, 2);
            expected_non_current += amount;
            accounts.push(balance(
                &format!("{}", 1600 + i),
                AccountType::Asset,
                amount,
                Decimal::ZERO,
            ));
        }

        let report = StatementService::balance_sheet(
            &StatementClassification::default(),
            as_of(),
            Currency::Usd,
            accounts,
        );

        prop_assert_eq!(report.assets.subsections.len(), 2);
        prop_assert_eq!(report.assets.subsections[0].name.as_str(), "current_assets");
        prop_assert_eq!(
            report.assets.subsections[1].name.as_str(),
            "non_current_assets"
        );
        prop_assert_eq!(report.assets.subsections[0].total, expected_current);
        prop_assert_eq!(report.assets.subsections[1].total, expected_non_current);
        prop_assert_eq!(
            report.assets.total,
            expected_current + expected_non_current
        );
        prop_assert_eq!(
            report.assets.accounts.len(),
            current.len() + non_current.len()
        );
    }

    /// Net income follows the statement formula: gross profit less
    /// operating expenses, plus other income, less other expenses.
    #[test]
    fn test_income_statement_net_income(
        revenue_cents in 0i64..1_000_000_000,
        cogs_cents in 0i64..500_000_000,
        opex_cents in 0i64..300_000_000,
        other_income_cents in 0i64..100_000_000,
        other_expense_cents in 0i64..100_000_000,
    ) {
        let revenue = Decimal::new(revenue_cents, 2);
        let cogs = Decimal::new(cogs_cents, 2);
        let opex = Decimal::new(opex_cents, 2);
        let other_income = Decimal::new(other_income_cents, 2);
        let other_expense = Decimal::new(other_expense_cents, 2);

        let accounts = vec![
            balance("4100", AccountType::Revenue, Decimal::ZERO, revenue),
            balance("4950", AccountType::Revenue, Decimal::ZERO, other_income),
            balance("5050", AccountType::Expense, cogs, Decimal::ZERO),
            balance("5500", AccountType::Expense, opex, Decimal::ZERO),
            balance("5950", AccountType::Expense, other_expense, Decimal::ZERO),
        ];

        let report = StatementService::income_statement(
            &StatementClassification::default(),
            as_of(),
            as_of(),
            Currency::Usd,
            accounts,
        );

        let expected_gross_profit = revenue - cogs;
        let expected_operating_income = expected_gross_profit - opex;
        let expected_net_income = expected_operating_income + other_income - other_expense;

        prop_assert_eq!(report.gross_profit, expected_gross_profit);
        prop_assert_eq!(report.operating_income, expected_operating_income);
        prop_assert_eq!(report.net_income, expected_net_income);
    }

    /// Contra accounts carry a negative balance and reduce their section
    /// total rather than inflating it.
    #[test]
    fn test_income_statement_contra_revenue_reduces_section(
        revenue_cents in 0i64..1_000_000_000,
        contra_cents in 0i64..100_000_000,
    ) {
        let revenue = Decimal::new(revenue_cents, 2);
        let contra = Decimal::new(contra_cents, 2);

        let accounts = vec![
            balance("4100", AccountType::Revenue, Decimal::ZERO, revenue),
            // Sales returns account: revenue type with debit activity.
            balance("4200", AccountType::Revenue, contra, Decimal::ZERO),
        ];

        let report = StatementService::income_statement(
            &StatementClassification::default(),
            as_of(),
            as_of(),
            Currency::Usd,
            accounts,
        );

        prop_assert_eq!(report.revenue.total, revenue - contra);
        prop_assert_eq!(report.net_income, revenue - contra);
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::statements::error::StatementError;

    #[test]
    fn test_trial_balance_empty_accounts() {
        let report = StatementService::trial_balance(as_of(), Currency::Usd, vec![]);

        assert_eq!(report.totals.total_debits, dec!(0));
        assert_eq!(report.totals.total_credits, dec!(0));
        assert_eq!(report.totals.difference, dec!(0));
        assert!(report.totals.is_balanced);
    }

    #[test]
    fn test_trial_balance_negative_balance_flips_column() {
        // Overdrawn cash: debit-normal account driven negative.
        let cash = balance("1100", AccountType::Asset, dec!(0), dec!(100.00));
        assert_eq!(cash.balance, dec!(-100.00));
        assert_eq!(cash.debit_column(), dec!(0));
        assert_eq!(cash.credit_column(), dec!(100.00));

        let report = StatementService::trial_balance(as_of(), Currency::Usd, vec![cash]);

        assert_eq!(report.totals.total_debits, dec!(0));
        assert_eq!(report.totals.total_credits, dec!(100.00));
        assert_eq!(report.totals.difference, dec!(-100.00));
        assert!(!report.totals.is_balanced);
    }

    #[test]
    fn test_trial_balance_sorts_accounts_by_code() {
        let accounts = vec![
            balance("4100", AccountType::Revenue, dec!(0), dec!(50)),
            balance("1100", AccountType::Asset, dec!(50), dec!(0)),
            balance("2100", AccountType::Liability, dec!(0), dec!(0)),
        ];

        let report = StatementService::trial_balance(as_of(), Currency::Usd, accounts);

        let codes: Vec<&str> = report.accounts.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["1100", "2100", "4100"]);
    }

    #[test]
    fn test_balance_sheet_empty_accounts() {
        let report = StatementService::balance_sheet(
            &StatementClassification::default(),
            as_of(),
            Currency::Usd,
            vec![],
        );

        assert_eq!(report.total_assets, dec!(0));
        assert_eq!(report.total_liabilities, dec!(0));
        assert_eq!(report.total_equity, dec!(0));
        assert_eq!(report.difference, dec!(0));
        assert!(report.is_balanced);
        assert_eq!(report.assets.subsections.len(), 2);
        assert_eq!(report.liabilities.subsections.len(), 2);
        assert!(report.equity.subsections.is_empty());
    }

    #[test]
    fn test_balance_sheet_sections() {
        let accounts = vec![
            balance("1100", AccountType::Asset, dec!(8000.00), dec!(0)),
            balance("1600", AccountType::Asset, dec!(12000.00), dec!(0)),
            balance("2100", AccountType::Liability, dec!(0), dec!(5000.00)),
            balance("2600", AccountType::Liability, dec!(0), dec!(7000.00)),
            balance("3100", AccountType::Equity, dec!(0), dec!(8000.00)),
        ];

        let report = StatementService::balance_sheet(
            &StatementClassification::default(),
            as_of(),
            Currency::Usd,
            accounts,
        );

        assert_eq!(report.total_assets, dec!(20000.00));
        assert_eq!(report.total_liabilities, dec!(12000.00));
        assert_eq!(report.total_equity, dec!(8000.00));
        assert_eq!(report.liabilities_and_equity, dec!(20000.00));
        assert!(report.is_balanced);

        assert_eq!(report.assets.subsections[0].total, dec!(8000.00));
        assert_eq!(report.assets.subsections[1].total, dec!(12000.00));
        assert_eq!(report.liabilities.subsections[0].name, "current_liabilities");
        assert_eq!(report.liabilities.subsections[0].total, dec!(5000.00));
        assert_eq!(
            report.liabilities.subsections[1].name,
            "non_current_liabilities"
        );
        assert_eq!(report.liabilities.subsections[1].total, dec!(7000.00));
    }

    #[test]
    fn test_balance_sheet_ignores_income_statement_accounts() {
        let accounts = vec![
            balance("4100", AccountType::Revenue, dec!(0), dec!(10000.00)),
            balance("5100", AccountType::Expense, dec!(5000.00), dec!(0)),
        ];

        let report = StatementService::balance_sheet(
            &StatementClassification::default(),
            as_of(),
            Currency::Usd,
            accounts,
        );

        assert_eq!(report.total_assets, dec!(0));
        assert_eq!(report.total_liabilities, dec!(0));
        assert_eq!(report.total_equity, dec!(0));
    }

    #[test]
    fn test_income_statement_empty_accounts() {
        let report = StatementService::income_statement(
            &StatementClassification::default(),
            as_of(),
            as_of(),
            Currency::Usd,
            vec![],
        );

        assert_eq!(report.revenue.total, dec!(0));
        assert_eq!(report.other_income.total, dec!(0));
        assert_eq!(report.cost_of_goods_sold.total, dec!(0));
        assert_eq!(report.gross_profit, dec!(0));
        assert_eq!(report.operating_income, dec!(0));
        assert_eq!(report.net_income, dec!(0));
    }

    #[test]
    fn test_income_statement_sections() {
        let accounts = vec![
            balance("4100", AccountType::Revenue, dec!(0), dec!(10000.00)),
            balance("4950", AccountType::Revenue, dec!(0), dec!(500.00)),
            balance("5050", AccountType::Expense, dec!(4000.00), dec!(0)),
            balance("5500", AccountType::Expense, dec!(2500.00), dec!(0)),
            balance("5950", AccountType::Expense, dec!(300.00), dec!(0)),
        ];

        let report = StatementService::income_statement(
            &StatementClassification::default(),
            as_of(),
            as_of(),
            Currency::Usd,
            accounts,
        );

        assert_eq!(report.revenue.total, dec!(10000.00));
        assert_eq!(report.other_income.total, dec!(500.00));
        assert_eq!(report.cost_of_goods_sold.total, dec!(4000.00));
        assert_eq!(report.gross_profit, dec!(6000.00));
        assert_eq!(report.operating_expenses.total, dec!(2500.00));
        assert_eq!(report.operating_income, dec!(3500.00));
        assert_eq!(report.other_expenses.total, dec!(300.00));
        assert_eq!(report.net_income, dec!(3700.00));
    }

    #[test]
    fn test_income_statement_ignores_balance_sheet_accounts() {
        let accounts = vec![
            balance("1100", AccountType::Asset, dec!(10000.00), dec!(0)),
            balance("2100", AccountType::Liability, dec!(0), dec!(5000.00)),
        ];

        let report = StatementService::income_statement(
            &StatementClassification::default(),
            as_of(),
            as_of(),
            Currency::Usd,
            accounts,
        );

        assert_eq!(report.revenue.total, dec!(0));
        assert_eq!(report.cost_of_goods_sold.total, dec!(0));
        assert_eq!(report.net_income, dec!(0));
    }

    #[test]
    fn test_validate_period() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();

        assert!(StatementService::validate_period(start, end).is_ok());
        assert!(StatementService::validate_period(start, start).is_ok());

        let err = StatementService::validate_period(end, start).unwrap_err();
        assert!(matches!(err, StatementError::InvalidDateRange { .. }));
    }
}
