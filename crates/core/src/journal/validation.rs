//! Journal entry validation rules.

use rust_decimal::Decimal;

use super::error::JournalError;
use super::types::{EntryTotals, JournalLineInput, LineSide};

/// Minimum number of lines in a journal entry.
pub const MIN_ENTRY_LINES: usize = 2;

/// Validates a set of journal entry lines and computes their totals.
///
/// Rules, in check order:
/// - the entry has at least [`MIN_ENTRY_LINES`] lines
/// - every line amount is positive
/// - both sides are represented
/// - total debits equal total credits exactly
///
/// # Errors
///
/// Returns the first [`JournalError`] encountered.
pub fn validate_lines(lines: &[JournalLineInput]) -> Result<EntryTotals, JournalError> {
    if lines.len() < MIN_ENTRY_LINES {
        return Err(JournalError::InsufficientLines);
    }

    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for line in lines {
        if line.amount == Decimal::ZERO {
            return Err(JournalError::ZeroAmount);
        }
        if line.amount < Decimal::ZERO {
            return Err(JournalError::NegativeAmount);
        }

        match line.side {
            LineSide::Debit => {
                total_debit += line.amount;
                has_debit = true;
            }
            LineSide::Credit => {
                total_credit += line.amount;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(JournalError::SingleSided);
    }

    let totals = EntryTotals::new(total_debit, total_credit);
    if !totals.is_balanced {
        return Err(JournalError::Unbalanced {
            debit: total_debit,
            credit: total_credit,
        });
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn line(side: LineSide, amount: Decimal) -> JournalLineInput {
        JournalLineInput {
            account_id: Uuid::new_v4(),
            side,
            amount,
            description: None,
            reference: None,
        }
    }

    #[test]
    fn test_balanced_lines() {
        let lines = vec![
            line(LineSide::Debit, dec!(100.00)),
            line(LineSide::Credit, dec!(100.00)),
        ];
        let totals = validate_lines(&lines).unwrap();
        assert_eq!(totals.total_debit, dec!(100.00));
        assert_eq!(totals.total_credit, dec!(100.00));
        assert!(totals.is_balanced);
    }

    #[test]
    fn test_split_entry_balances() {
        // One debit funded by two credits.
        let lines = vec![
            line(LineSide::Debit, dec!(150.00)),
            line(LineSide::Credit, dec!(100.00)),
            line(LineSide::Credit, dec!(50.00)),
        ];
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_unbalanced_rejected() {
        let lines = vec![
            line(LineSide::Debit, dec!(1000.00)),
            line(LineSide::Credit, dec!(900.00)),
        ];
        assert_eq!(
            validate_lines(&lines),
            Err(JournalError::Unbalanced {
                debit: dec!(1000.00),
                credit: dec!(900.00),
            })
        );
    }

    #[test]
    fn test_one_cent_off_rejected() {
        let lines = vec![
            line(LineSide::Debit, dec!(100.00)),
            line(LineSide::Credit, dec!(100.01)),
        ];
        assert!(matches!(
            validate_lines(&lines),
            Err(JournalError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_too_few_lines_rejected() {
        assert_eq!(validate_lines(&[]), Err(JournalError::InsufficientLines));
        let lines = vec![line(LineSide::Debit, dec!(100.00))];
        assert_eq!(validate_lines(&lines), Err(JournalError::InsufficientLines));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let lines = vec![
            line(LineSide::Debit, Decimal::ZERO),
            line(LineSide::Credit, Decimal::ZERO),
        ];
        assert_eq!(validate_lines(&lines), Err(JournalError::ZeroAmount));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let lines = vec![
            line(LineSide::Debit, dec!(-50.00)),
            line(LineSide::Credit, dec!(-50.00)),
        ];
        assert_eq!(validate_lines(&lines), Err(JournalError::NegativeAmount));
    }

    #[test]
    fn test_single_sided_rejected() {
        let lines = vec![
            line(LineSide::Debit, dec!(50.00)),
            line(LineSide::Debit, dec!(50.00)),
        ];
        assert_eq!(validate_lines(&lines), Err(JournalError::SingleSided));
    }
}
