//! Property-based tests for journal entry validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::JournalError;
use super::types::{JournalLineInput, LineSide};
use super::validation::validate_lines;

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // Amounts from 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a line side.
fn side_strategy() -> impl Strategy<Value = LineSide> {
    prop_oneof![Just(LineSide::Debit), Just(LineSide::Credit)]
}

/// Helper to create a line for testing.
fn make_line(side: LineSide, amount: Decimal) -> JournalLineInput {
    JournalLineInput {
        account_id: Uuid::new_v4(),
        side,
        amount,
        description: None,
        reference: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property: zero-amount lines are rejected**
    ///
    /// *For any* entry containing a zero-amount line, validation fails
    /// regardless of the other lines.
    #[test]
    fn prop_zero_amount_rejected(
        side in side_strategy(),
        other_amount in positive_amount(),
    ) {
        let lines = vec![
            make_line(side, Decimal::ZERO),
            make_line(side.opposite(), other_amount),
        ];

        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(JournalError::ZeroAmount)),
            "zero amount should be rejected, got: {:?}",
            result
        );
    }

    /// **Property: negative-amount lines are rejected**
    #[test]
    fn prop_negative_amount_rejected(
        side in side_strategy(),
        cents in 1i64..100_000_000i64,
        other_amount in positive_amount(),
    ) {
        let lines = vec![
            make_line(side, Decimal::new(-cents, 2)),
            make_line(side.opposite(), other_amount),
        ];

        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(JournalError::NegativeAmount)),
            "negative amount should be rejected, got: {:?}",
            result
        );
    }

    /// **Property: fewer than two lines is rejected**
    #[test]
    fn prop_single_line_rejected(
        side in side_strategy(),
        amount in positive_amount(),
    ) {
        let result = validate_lines(&[make_line(side, amount)]);
        prop_assert!(
            matches!(result, Err(JournalError::InsufficientLines)),
            "single line should be rejected, got: {:?}",
            result
        );
    }

    /// **Property: same-side-only entries are rejected**
    ///
    /// *For any* entry whose lines are all debits or all credits,
    /// validation fails before the balance comparison.
    #[test]
    fn prop_single_sided_rejected(
        side in side_strategy(),
        amounts in prop::collection::vec(1i64..100_000_000i64, 2..6),
    ) {
        let lines: Vec<JournalLineInput> = amounts
            .iter()
            .map(|&cents| make_line(side, Decimal::new(cents, 2)))
            .collect();

        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(JournalError::SingleSided)),
            "single-sided entry should be rejected, got: {:?}",
            result
        );
    }

    /// **Property: unequal totals are rejected with both sums reported**
    #[test]
    fn prop_unbalanced_rejected(
        amount in positive_amount(),
        extra in positive_amount(),
    ) {
        let lines = vec![
            make_line(LineSide::Debit, amount + extra),
            make_line(LineSide::Credit, amount),
        ];

        match validate_lines(&lines) {
            Err(JournalError::Unbalanced { debit, credit }) => {
                prop_assert_eq!(debit, amount + extra);
                prop_assert_eq!(credit, amount);
            }
            other => prop_assert!(false, "expected Unbalanced, got: {other:?}"),
        }
    }

    /// **Property: balanced entries are accepted with exact totals**
    #[test]
    fn prop_balanced_entry_accepted(amount in positive_amount()) {
        let lines = vec![
            make_line(LineSide::Debit, amount),
            make_line(LineSide::Credit, amount),
        ];

        let totals = validate_lines(&lines);
        prop_assert!(totals.is_ok(), "balanced entry rejected: {:?}", totals);
        let totals = totals.unwrap();
        prop_assert_eq!(totals.total_debit, amount);
        prop_assert_eq!(totals.total_credit, amount);
        prop_assert!(totals.is_balanced);
    }

    /// **Property: multi-line entries balance by sum, not by pairing**
    ///
    /// *For any* set of debit amounts, a single credit line for their sum
    /// balances the entry.
    #[test]
    fn prop_multi_line_balanced_accepted(
        debit_cents in prop::collection::vec(1i64..1_000_000i64, 1..8),
    ) {
        let mut lines: Vec<JournalLineInput> = debit_cents
            .iter()
            .map(|&cents| make_line(LineSide::Debit, Decimal::new(cents, 2)))
            .collect();
        let total: i64 = debit_cents.iter().sum();
        lines.push(make_line(LineSide::Credit, Decimal::new(total, 2)));

        prop_assert!(validate_lines(&lines).is_ok());
    }
}
