//! Reversal entry construction.
//!
//! A reversal negates a posted entry by posting a new entry with every
//! line's side swapped. The original entry is never mutated or deleted;
//! both entries stay in history and their net ledger effect is zero.

use super::types::JournalLineInput;

/// Prefix prepended to a reversal entry's description.
pub const REVERSAL_DESCRIPTION_PREFIX: &str = "Reversal: ";

/// Builds the description for a reversal entry.
#[must_use]
pub fn reversal_description(original: &str) -> String {
    format!("{REVERSAL_DESCRIPTION_PREFIX}{original}")
}

/// Builds the mirror of a single line: same account, same amount,
/// opposite side.
#[must_use]
pub fn reverse_line(line: &JournalLineInput) -> JournalLineInput {
    JournalLineInput {
        account_id: line.account_id,
        side: line.side.opposite(),
        amount: line.amount,
        description: line.description.clone(),
        reference: line.reference.clone(),
    }
}

/// Builds the full reversal line set for an entry, preserving line order.
#[must_use]
pub fn build_reversal_lines(lines: &[JournalLineInput]) -> Vec<JournalLineInput> {
    lines.iter().map(reverse_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::types::LineSide;
    use crate::journal::validation::validate_lines;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn line(side: LineSide, amount: Decimal) -> JournalLineInput {
        JournalLineInput {
            account_id: Uuid::new_v4(),
            side,
            amount,
            description: Some("original line".to_string()),
            reference: Some("REF-1".to_string()),
        }
    }

    #[test]
    fn test_reverse_line_swaps_side_only() {
        let original = line(LineSide::Debit, dec!(250.00));
        let reversed = reverse_line(&original);

        assert_eq!(reversed.side, LineSide::Credit);
        assert_eq!(reversed.account_id, original.account_id);
        assert_eq!(reversed.amount, original.amount);
        assert_eq!(reversed.description, original.description);
        assert_eq!(reversed.reference, original.reference);
    }

    #[test]
    fn test_reversal_totals_match_original() {
        let lines = vec![
            line(LineSide::Debit, dec!(1000.00)),
            line(LineSide::Credit, dec!(1000.00)),
        ];
        let original_totals = validate_lines(&lines).unwrap();

        let reversed = build_reversal_lines(&lines);
        let reversed_totals = validate_lines(&reversed).unwrap();

        assert_eq!(reversed_totals.total_debit, original_totals.total_credit);
        assert_eq!(reversed_totals.total_credit, original_totals.total_debit);
        assert!(reversed_totals.is_balanced);
    }

    #[test]
    fn test_description_prefix() {
        assert_eq!(
            reversal_description("Office rent January"),
            "Reversal: Office rent January"
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// **Property: reversing twice restores the original lines**
        #[test]
        fn prop_double_reversal_is_identity(
            amounts in prop::collection::vec(1i64..1_000_000, 2..10),
        ) {
            let lines: Vec<JournalLineInput> = amounts
                .iter()
                .enumerate()
                .map(|(i, &cents)| {
                    let side = if i % 2 == 0 { LineSide::Debit } else { LineSide::Credit };
                    line(side, Decimal::new(cents, 2))
                })
                .collect();

            let round_trip = build_reversal_lines(&build_reversal_lines(&lines));

            prop_assert_eq!(round_trip.len(), lines.len());
            for (original, restored) in lines.iter().zip(&round_trip) {
                prop_assert_eq!(restored.account_id, original.account_id);
                prop_assert_eq!(restored.side, original.side);
                prop_assert_eq!(restored.amount, original.amount);
            }
        }

        /// **Property: a balanced entry's reversal is balanced**
        #[test]
        fn prop_reversal_preserves_balance(
            half in prop::collection::vec(1i64..1_000_000, 1..8),
        ) {
            // Mirror each amount on both sides so the entry balances.
            let mut lines = Vec::new();
            for &cents in &half {
                lines.push(line(LineSide::Debit, Decimal::new(cents, 2)));
                lines.push(line(LineSide::Credit, Decimal::new(cents, 2)));
            }
            prop_assume!(validate_lines(&lines).is_ok());

            let reversed = build_reversal_lines(&lines);
            prop_assert!(validate_lines(&reversed).is_ok());
        }
    }
}
