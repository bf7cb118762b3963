//! Account hierarchy rules.
//!
//! Accounts form a forest: each account may have one parent of the same
//! account type, and parent chains must never loop back on themselves.
//! Cycle detection walks the ancestor chain at write time instead of
//! trusting later reads to notice corruption.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::AccountError;
use super::types::AccountType;

/// Maximum supported ancestor-chain depth.
pub const MAX_HIERARCHY_DEPTH: usize = 64;

/// Parent pointer for one account, used for cycle checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    /// The account ID.
    pub id: Uuid,
    /// The account's parent, if any.
    pub parent_id: Option<Uuid>,
}

/// The resolved parent candidate for a parent assignment.
#[derive(Debug, Clone, Copy)]
pub struct ParentAccount {
    /// The parent account ID.
    pub id: Uuid,
    /// The parent's account type.
    pub account_type: AccountType,
}

/// Outcome of walking the ancestor chain from a proposed parent.
enum AncestorWalk {
    /// Chain terminates without reaching the account.
    Clear,
    /// The account reappears among its own ancestors.
    Cycle,
    /// Chain is longer than [`MAX_HIERARCHY_DEPTH`].
    TooDeep,
}

/// Walks the ancestor chain starting at `new_parent_id`, looking for
/// `account_id` and bounding the walk at [`MAX_HIERARCHY_DEPTH`].
fn walk_ancestors(account_id: Uuid, new_parent_id: Uuid, links: &[ParentLink]) -> AncestorWalk {
    let parents: HashMap<Uuid, Option<Uuid>> =
        links.iter().map(|link| (link.id, link.parent_id)).collect();

    let mut current = Some(new_parent_id);
    let mut depth = 0;
    while let Some(id) = current {
        if id == account_id {
            return AncestorWalk::Cycle;
        }
        depth += 1;
        if depth > MAX_HIERARCHY_DEPTH {
            return AncestorWalk::TooDeep;
        }
        current = parents.get(&id).copied().flatten();
    }
    AncestorWalk::Clear
}

/// Returns true if making `new_parent_id` the parent of `account_id` would
/// create a cycle.
///
/// A cycle exists when `account_id` reappears among its own would-be
/// ancestors. Chains longer than [`MAX_HIERARCHY_DEPTH`] also report true:
/// past the bound the walk cannot prove the chain terminates.
#[must_use]
pub fn would_create_cycle(account_id: Uuid, new_parent_id: Uuid, links: &[ParentLink]) -> bool {
    !matches!(
        walk_ancestors(account_id, new_parent_id, links),
        AncestorWalk::Clear
    )
}

/// Validates a parent assignment for an account.
///
/// The parent must share the child's account type, the assignment must not
/// create a cycle in the ancestor chain, and the resulting chain must stay
/// within [`MAX_HIERARCHY_DEPTH`].
///
/// # Errors
///
/// Returns [`AccountError::ParentTypeMismatch`], [`AccountError::ParentCycle`],
/// or [`AccountError::HierarchyTooDeep`] when a rule is violated.
pub fn validate_parent(
    child_id: Uuid,
    child_type: AccountType,
    parent: ParentAccount,
    links: &[ParentLink],
) -> Result<(), AccountError> {
    if parent.account_type != child_type {
        return Err(AccountError::ParentTypeMismatch {
            parent: parent.account_type,
            child: child_type,
        });
    }
    match walk_ancestors(child_id, parent.id, links) {
        AncestorWalk::Clear => Ok(()),
        AncestorWalk::Cycle => Err(AccountError::ParentCycle(child_id)),
        AncestorWalk::TooDeep => Err(AccountError::HierarchyTooDeep(child_id)),
    }
}

/// Flat account row used to build the hierarchy tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Parent account, if any.
    pub parent_id: Option<Uuid>,
    /// Whether the account is active.
    pub is_active: bool,
    /// Cached current balance.
    pub current_balance: Decimal,
}

/// A node in the account tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountNode {
    /// The account at this node.
    pub account: AccountSummary,
    /// Child accounts, sorted by code.
    pub children: Vec<AccountNode>,
}

/// Builds the account tree from a flat list.
///
/// Roots are accounts with no parent. An account whose parent is absent
/// from the input (for example, filtered out) is also treated as a root so
/// it is never silently dropped. Siblings are sorted by code.
#[must_use]
pub fn build_tree(accounts: Vec<AccountSummary>) -> Vec<AccountNode> {
    let ids: HashSet<Uuid> = accounts.iter().map(|account| account.id).collect();

    let mut by_parent: HashMap<Option<Uuid>, Vec<AccountSummary>> = HashMap::new();
    for account in accounts {
        let key = account.parent_id.filter(|parent| ids.contains(parent));
        by_parent.entry(key).or_default().push(account);
    }

    attach_children(None, &mut by_parent)
}

fn attach_children(
    parent: Option<Uuid>,
    by_parent: &mut HashMap<Option<Uuid>, Vec<AccountSummary>>,
) -> Vec<AccountNode> {
    let mut rows = by_parent.remove(&parent).unwrap_or_default();
    rows.sort_by(|a, b| a.code.cmp(&b.code));

    rows.into_iter()
        .map(|account| {
            let children = attach_children(Some(account.id), by_parent);
            AccountNode { account, children }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn link(id: Uuid, parent_id: Option<Uuid>) -> ParentLink {
        ParentLink { id, parent_id }
    }

    fn summary(id: Uuid, code: &str, parent_id: Option<Uuid>) -> AccountSummary {
        AccountSummary {
            id,
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type: AccountType::Asset,
            parent_id,
            is_active: true,
            current_balance: Decimal::ZERO,
        }
    }

    #[test]
    fn test_self_parent_is_cycle() {
        let a = Uuid::new_v4();
        assert!(would_create_cycle(a, a, &[link(a, None)]));
    }

    #[test]
    fn test_direct_cycle_detected() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        // a's parent is b; making b's parent a closes the loop.
        let links = vec![link(a, Some(b)), link(b, None)];
        assert!(would_create_cycle(b, a, &links));
    }

    #[test]
    fn test_deep_cycle_detected() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let links = vec![link(a, None), link(b, Some(a)), link(c, Some(b))];
        // Re-parenting a under c would make a its own ancestor.
        assert!(would_create_cycle(a, c, &links));
    }

    #[test]
    fn test_valid_parent_is_not_cycle() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let links = vec![link(a, None), link(b, Some(a)), link(c, None)];
        assert!(!would_create_cycle(c, b, &links));
    }

    #[test]
    fn test_validate_parent_type_mismatch() {
        let child = Uuid::new_v4();
        let parent = Uuid::new_v4();
        let result = validate_parent(
            child,
            AccountType::Expense,
            ParentAccount {
                id: parent,
                account_type: AccountType::Asset,
            },
            &[link(parent, None)],
        );
        assert!(matches!(
            result,
            Err(AccountError::ParentTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_parent_ok() {
        let child = Uuid::new_v4();
        let parent = Uuid::new_v4();
        let result = validate_parent(
            child,
            AccountType::Asset,
            ParentAccount {
                id: parent,
                account_type: AccountType::Asset,
            },
            &[link(parent, None)],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_parent_rejects_over_deep_chain() {
        // Acyclic chain one level past the depth bound.
        let ids: Vec<Uuid> = (0..=MAX_HIERARCHY_DEPTH + 1).map(|_| Uuid::new_v4()).collect();
        let links: Vec<ParentLink> = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| link(id, ids.get(i + 1).copied()))
            .collect();

        let child = Uuid::new_v4();
        let result = validate_parent(
            child,
            AccountType::Asset,
            ParentAccount {
                id: ids[0],
                account_type: AccountType::Asset,
            },
            &links,
        );
        assert_eq!(result, Err(AccountError::HierarchyTooDeep(child)));

        // The conservative boolean check also refuses it.
        assert!(would_create_cycle(child, ids[0], &links));
    }

    #[test]
    fn test_build_tree_nests_and_sorts() {
        let root_a = Uuid::new_v4();
        let root_b = Uuid::new_v4();
        let child = Uuid::new_v4();
        let grandchild = Uuid::new_v4();

        let tree = build_tree(vec![
            summary(root_b, "1200", None),
            summary(grandchild, "1111", Some(child)),
            summary(root_a, "1100", None),
            summary(child, "1110", Some(root_a)),
        ]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].account.code, "1100");
        assert_eq!(tree[1].account.code, "1200");
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].account.code, "1110");
        assert_eq!(tree[0].children[0].children[0].account.code, "1111");
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_build_tree_orphan_becomes_root() {
        let missing_parent = Uuid::new_v4();
        let orphan = Uuid::new_v4();

        let tree = build_tree(vec![summary(orphan, "1500", Some(missing_parent))]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].account.code, "1500");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// **Property: linear chains never report a cycle for a fresh child**
        #[test]
        fn prop_chain_without_loop_is_acyclic(len in 1usize..20) {
            let ids: Vec<Uuid> = (0..len).map(|_| Uuid::new_v4()).collect();
            let links: Vec<ParentLink> = ids
                .iter()
                .enumerate()
                .map(|(i, &id)| link(id, ids.get(i + 1).copied()))
                .collect();

            let fresh = Uuid::new_v4();
            prop_assert!(!would_create_cycle(fresh, ids[0], &links));
        }

        /// **Property: closing a chain back onto any ancestor is a cycle**
        #[test]
        fn prop_closing_chain_is_cycle(len in 2usize..20, target in 0usize..19) {
            prop_assume!(target < len);

            let ids: Vec<Uuid> = (0..len).map(|_| Uuid::new_v4()).collect();
            // Chain: ids[0] -> ids[1] -> ... -> ids[len-1] -> None
            let links: Vec<ParentLink> = ids
                .iter()
                .enumerate()
                .map(|(i, &id)| link(id, ids.get(i + 1).copied()))
                .collect();

            // Making ids[target] a child of the chain head walks back to it.
            prop_assert!(would_create_cycle(ids[target], ids[0], &links));
        }

        /// **Property: build_tree keeps every input account**
        #[test]
        fn prop_build_tree_preserves_accounts(count in 0usize..30) {
            let mut accounts = Vec::with_capacity(count);
            let mut prev: Option<Uuid> = None;
            for i in 0..count {
                let id = Uuid::new_v4();
                // Every third account starts a new root.
                let parent = if i % 3 == 0 { None } else { prev };
                accounts.push(summary(id, &format!("{:04}", 1000 + i), parent));
                prev = Some(id);
            }

            let tree = build_tree(accounts);

            fn count_nodes(nodes: &[AccountNode]) -> usize {
                nodes.iter().map(|n| 1 + count_nodes(&n.children)).sum()
            }
            prop_assert_eq!(count_nodes(&tree), count);
        }
    }
}
