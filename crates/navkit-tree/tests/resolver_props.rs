#![forbid(unsafe_code)]

//! Property tests for the back-stack resolver over random container chains.
//!
//! # Invariants
//!
//! 1. A lone non-portal container with one entry is never popped.
//! 2. A pop removes exactly one entry, from exactly one container.
//! 3. The popped container is the nearest eligible one on the parent chain.
//! 4. Containers below the popped one are untouched.

use navkit_core::NavId;
use navkit_harness::{ScriptedTransitioner, named_view, stack_names};
use navkit_tree::{NavOptions, NavTree, find_active_leaf, find_poppable, resolve, resolve_and_run};
use proptest::prelude::*;

/// Build a chain root -> ... -> leaf, each link the active child of its parent.
/// `levels[i]` is `(entries, is_portal)` for depth `i` (0 = root).
fn build_chain(levels: &[(usize, bool)]) -> (NavTree, Vec<NavId>) {
    let mut tree = NavTree::new();
    let mut ids = Vec::with_capacity(levels.len());
    for (depth, &(entries, portal)) in levels.iter().enumerate() {
        let id = match ids.last() {
            None if portal => tree.create_portal(),
            None => tree.create_root(),
            Some(&parent) => {
                let child = tree.create_child(parent).unwrap();
                tree.set_active_child(parent, Some(child)).unwrap();
                child
            }
        };
        for n in 0..entries {
            tree.push(id, named_view(&format!("d{depth}-{n}")), NavOptions::new())
                .unwrap();
        }
        ids.push(id);
    }
    (tree, ids)
}

fn eligible(entries: usize, portal: bool) -> bool {
    entries > 1 || (portal && entries > 0)
}

#[test]
fn lone_single_entry_root_never_pops() {
    let (mut tree, ids) = build_chain(&[(1, false)]);
    let transitions = ScriptedTransitioner::instant();
    for _ in 0..3 {
        let result = resolve_and_run(&mut tree, Some(ids[0]), &*transitions);
        assert!(result.is_nothing_to_pop());
    }
    assert_eq!(tree.len(ids[0]), 1);
    assert!(transitions.log().is_empty());
}

#[test]
fn three_level_chain_pops_from_top_ancestor() {
    // C1(len=1) -> C2(len=1) -> C3(len=2), C3 being the root.
    let (mut tree, ids) = build_chain(&[(2, false), (1, false), (1, false)]);
    let leaf = find_active_leaf(&tree, Some(ids[0]));
    assert_eq!(leaf, Some(ids[2]));

    let transitions = ScriptedTransitioner::instant();
    let result = resolve_and_run(&mut tree, leaf, &*transitions);
    assert!(result.is_popped());
    assert_eq!(stack_names(&tree, ids[0]), vec!["d0-0"]);
    assert_eq!(tree.len(ids[1]), 1);
    assert_eq!(tree.len(ids[2]), 1);

    let log = transitions.log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].nav, ids[0]);
    assert_eq!(log[0].removed, vec!["d0-1"]);
}

proptest! {
    #[test]
    fn resolver_pops_nearest_eligible(
        levels in prop::collection::vec((0usize..4, any::<bool>()), 1..6)
    ) {
        let (mut tree, ids) = build_chain(&levels);
        let before: Vec<usize> = ids.iter().map(|id| tree.len(*id)).collect();
        let leaf = find_active_leaf(&tree, Some(ids[0]));
        prop_assert_eq!(leaf, ids.last().copied());

        let expected = (0..levels.len())
            .rev()
            .find(|&i| {
                // Only the root may be a portal in this construction.
                let portal = i == 0 && levels[0].1;
                eligible(levels[i].0, portal)
            });
        prop_assert_eq!(find_poppable(&tree, leaf), expected.map(|i| ids[i]));

        let request = resolve(&mut tree, leaf);
        prop_assert_eq!(request.is_some(), expected.is_some());

        for (i, id) in ids.iter().enumerate() {
            let after = tree.len(*id);
            if Some(i) == expected {
                prop_assert_eq!(after + 1, before[i]);
            } else {
                prop_assert_eq!(after, before[i]);
            }
        }
    }
}
