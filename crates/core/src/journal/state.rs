//! Journal entry lifecycle state.
//!
//! Entries move from draft to posted and never back. A posted entry is
//! immutable; its effect is undone only by a separate reversing entry.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryState {
    /// The entry can still be modified or deleted.
    Draft,
    /// The entry has been written to the general ledger.
    Posted,
}

impl EntryState {
    /// Derives the state from the stored posted flag.
    #[must_use]
    pub const fn from_posted_flag(is_posted: bool) -> Self {
        if is_posted { Self::Posted } else { Self::Draft }
    }

    /// Returns true if the entry can be updated.
    #[must_use]
    pub const fn can_update(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry can be deleted.
    #[must_use]
    pub const fn can_delete(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry can be posted.
    #[must_use]
    pub const fn can_post(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry can be reversed.
    #[must_use]
    pub const fn can_reverse(self) -> bool {
        matches!(self, Self::Posted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_posted_flag() {
        assert_eq!(EntryState::from_posted_flag(false), EntryState::Draft);
        assert_eq!(EntryState::from_posted_flag(true), EntryState::Posted);
    }

    #[test]
    fn test_draft_permissions() {
        let state = EntryState::Draft;
        assert!(state.can_update());
        assert!(state.can_delete());
        assert!(state.can_post());
        assert!(!state.can_reverse());
    }

    #[test]
    fn test_posted_permissions() {
        let state = EntryState::Posted;
        assert!(!state.can_update());
        assert!(!state.can_delete());
        assert!(!state.can_post());
        assert!(state.can_reverse());
    }
}
