#![forbid(unsafe_code)]

//! Back-stack resolution.
//!
//! Starting from the active leaf, climb the parent chain and pop one entry
//! from the first container that can spare one:
//!
//! ```text
//!   evaluate(C):
//!     C absent                              -> nothing to pop
//!     len(C) > 1 or (portal(C) and len > 0) -> pop last entry of C
//!     otherwise                             -> evaluate(parent(C))
//! ```
//!
//! The climb is a loop, not recursion; it terminates because the tree keeps
//! the parent chain acyclic. At most one entry is popped per call no matter
//! how many ancestors were skipped.

use navkit_core::{NavId, NavResult, NoPopReason};

use crate::options::NavOptions;
use crate::transition::{TransitionRequest, Transitioner};
use crate::tree::NavTree;

/// The nearest container on `start`'s parent chain (inclusive) that may pop.
#[must_use]
pub fn find_poppable(tree: &NavTree, start: Option<NavId>) -> Option<NavId> {
    let mut current = start;
    while let Some(id) = current {
        let container = tree.get(id)?;
        if container.can_pop() {
            return Some(id);
        }
        current = container.parent();
    }
    None
}

/// Pop one entry from the nearest eligible container.
///
/// Returns the transition to play, or `None` when nothing can be popped.
/// The transition has not been started; see [`resolve_and_run`].
pub fn resolve(tree: &mut NavTree, start: Option<NavId>) -> Option<TransitionRequest> {
    let target = find_poppable(tree, start)?;
    match tree.pop(target, NavOptions::default()) {
        Ok(request) => {
            tracing::debug!(nav = %target, "back pop nav");
            Some(request)
        }
        Err(err) => {
            tracing::warn!(nav = %target, %err, "eligible nav refused pop");
            None
        }
    }
}

/// [`resolve`], then hand the transition to `transitioner`.
pub fn resolve_and_run(
    tree: &mut NavTree,
    start: Option<NavId>,
    transitioner: &dyn Transitioner,
) -> NavResult {
    match resolve(tree, start) {
        Some(request) => NavResult::Popped(transitioner.transition(request)),
        None => NavResult::NothingToPop(NoPopReason::StackExhausted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::InstantTransitioner;
    use crate::view::{View, ViewEntry};

    struct Page;

    impl View for Page {
        fn component_name(&self) -> &str {
            "Page"
        }
    }

    fn fill(tree: &mut NavTree, nav: NavId, n: usize) {
        for _ in 0..n {
            tree.push(nav, ViewEntry::new(Page), NavOptions::new())
                .unwrap();
        }
    }

    #[test]
    fn absent_start_is_nothing() {
        let mut tree = NavTree::new();
        assert!(resolve(&mut tree, None).is_none());
        assert!(
            resolve_and_run(&mut tree, Some(NavId::from_raw(9)), &InstantTransitioner)
                .is_nothing_to_pop()
        );
    }

    #[test]
    fn single_entry_root_is_untouched() {
        let mut tree = NavTree::new();
        let root = tree.create_root();
        fill(&mut tree, root, 1);
        assert!(resolve(&mut tree, Some(root)).is_none());
        assert_eq!(tree.len(root), 1);
    }

    #[test]
    fn pops_exactly_one() {
        let mut tree = NavTree::new();
        let root = tree.create_root();
        fill(&mut tree, root, 3);
        let result = resolve_and_run(&mut tree, Some(root), &InstantTransitioner);
        assert!(result.is_popped());
        assert_eq!(tree.len(root), 2);
    }

    #[test]
    fn portal_with_one_entry_pops() {
        let mut tree = NavTree::new();
        let portal = tree.create_portal();
        fill(&mut tree, portal, 1);
        assert_eq!(find_poppable(&tree, Some(portal)), Some(portal));
        assert!(resolve(&mut tree, Some(portal)).is_some());
        assert_eq!(tree.len(portal), 0);
    }

    #[test]
    fn empty_portal_climbs() {
        let mut tree = NavTree::new();
        let portal = tree.create_portal();
        assert_eq!(find_poppable(&tree, Some(portal)), None);
    }

    #[test]
    fn climbs_to_first_eligible_ancestor() {
        let mut tree = NavTree::new();
        let c3 = tree.create_root();
        let c2 = tree.create_child(c3).unwrap();
        let c1 = tree.create_child(c2).unwrap();
        fill(&mut tree, c3, 2);
        fill(&mut tree, c2, 1);
        fill(&mut tree, c1, 1);

        let request = resolve(&mut tree, Some(c1)).unwrap();
        assert_eq!(request.nav, c3);
        assert_eq!(tree.len(c3), 1);
        assert_eq!(tree.len(c2), 1);
        assert_eq!(tree.len(c1), 1);
    }

    #[test]
    fn nearest_eligible_wins() {
        let mut tree = NavTree::new();
        let outer = tree.create_root();
        let inner = tree.create_child(outer).unwrap();
        fill(&mut tree, outer, 4);
        fill(&mut tree, inner, 2);

        assert_eq!(find_poppable(&tree, Some(inner)), Some(inner));
    }
}
