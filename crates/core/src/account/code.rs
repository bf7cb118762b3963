//! Account code format rules.
//!
//! Account codes are exactly four ASCII digits. The numeric value of a code
//! also drives statement classification (current vs non-current, operating
//! vs non-operating), so a parsing helper lives here too.

use super::error::AccountError;

/// Number of digits in an account code.
pub const ACCOUNT_CODE_LEN: usize = 4;

/// Returns true if `code` is a well-formed account code.
#[must_use]
pub fn is_valid_code(code: &str) -> bool {
    code.len() == ACCOUNT_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// Validates an account code's format.
///
/// # Errors
///
/// Returns [`AccountError::InvalidCode`] if the code is not exactly four
/// ASCII digits.
pub fn validate_code(code: &str) -> Result<(), AccountError> {
    if is_valid_code(code) {
        Ok(())
    } else {
        Err(AccountError::InvalidCode(code.to_string()))
    }
}

/// Parses a well-formed account code into its numeric value.
///
/// Returns `None` for malformed codes.
#[must_use]
pub fn code_number(code: &str) -> Option<u32> {
    if is_valid_code(code) {
        code.parse().ok()
    } else {
        None
    }
}
