//! Journal entry sequence numbers.
//!
//! Entry numbers follow `{PREFIX}-{YEAR}-{NNNN}`, for example `JE-2026-0042`.
//! The prefix comes from the entry type, the counter restarts each year per
//! organization and type, and the next counter is the prior maximum plus one.
//! Uniqueness is ultimately enforced by a storage constraint; this module
//! only does the formatting and arithmetic.

use super::types::JournalEntryType;

/// Minimum width of the zero-padded counter.
pub const COUNTER_WIDTH: usize = 4;

/// Parsed components of an entry number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryNumberParts {
    /// The entry type prefix, for example "JE".
    pub prefix: String,
    /// The four-digit year.
    pub year: i32,
    /// The counter value.
    pub counter: u32,
}

/// Formats an entry number from its components.
#[must_use]
pub fn format_entry_number(entry_type: JournalEntryType, year: i32, counter: u32) -> String {
    format!(
        "{}-{}-{:0width$}",
        entry_type.sequence_prefix(),
        year,
        counter,
        width = COUNTER_WIDTH
    )
}

/// Parses an entry number into its components.
///
/// Returns `None` when the string does not have the `PREFIX-YEAR-COUNTER`
/// shape.
#[must_use]
pub fn parse_entry_number(entry_number: &str) -> Option<EntryNumberParts> {
    let mut parts = entry_number.splitn(3, '-');
    let prefix = parts.next()?;
    let year = parts.next()?.parse().ok()?;
    let counter = parts.next()?.parse().ok()?;

    if prefix.is_empty() {
        return None;
    }

    Some(EntryNumberParts {
        prefix: prefix.to_string(),
        year,
        counter,
    })
}

/// Computes the next entry number for an organization, type, and year.
///
/// `existing` is the set of entry numbers already issued; numbers with a
/// different prefix or year are ignored. The next counter is the maximum
/// matching counter plus one, or 1 when none match.
#[must_use]
pub fn next_entry_number<'a, I>(entry_type: JournalEntryType, year: i32, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = entry_type.sequence_prefix();
    let next = existing
        .into_iter()
        .filter_map(parse_entry_number)
        .filter(|parts| parts.prefix == prefix && parts.year == year)
        .map(|parts| parts.counter)
        .max()
        .map_or(1, |max| max + 1);

    format_entry_number(entry_type, year, next)
}
