#![forbid(unsafe_code)]

//! Active-leaf lookup.

use navkit_core::NavId;

use crate::tree::NavTree;

/// Follow active-child links from `root` down to the visible leaf.
///
/// Returns `root` itself when it has no active child and `None` when `root`
/// is `None` or not in the tree. The tree's acyclicity guarantees
/// termination.
#[must_use]
pub fn find_active_leaf(tree: &NavTree, root: Option<NavId>) -> Option<NavId> {
    let mut nav = root.filter(|id| tree.contains(*id))?;
    while let Some(child) = tree.active_child(nav) {
        nav = child;
    }
    Some(nav)
}
