#![forbid(unsafe_code)]

//! Overlay portal containers.
//!
//! Each [`PortalSlot`] maps to one portal container. The registry creates a
//! slot's container the first time it is asked for and keeps it until
//! [`PortalRegistry::teardown`], which the app shell calls on unmount.

use navkit_core::NavId;

use crate::tree::NavTree;
use crate::view::ViewEntry;

/// Logical overlay layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PortalSlot {
    /// Alerts, action sheets, popovers.
    #[default]
    Default,
    /// Full-screen modals.
    Modal,
    /// Loading indicators.
    Loading,
    /// Toasts.
    Toast,
}

impl PortalSlot {
    /// Every slot, in declaration order.
    pub const ALL: [PortalSlot; 4] = [Self::Default, Self::Modal, Self::Loading, Self::Toast];

    const fn index(self) -> usize {
        match self {
            Self::Default => 0,
            Self::Modal => 1,
            Self::Loading => 2,
            Self::Toast => 3,
        }
    }
}

/// Lazily materialized portal containers, one per slot.
#[derive(Debug, Default)]
pub struct PortalRegistry {
    portals: [Option<NavId>; 4],
}

impl PortalRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The container for `slot`, created on first access.
    pub fn portal_for(&mut self, tree: &mut NavTree, slot: PortalSlot) -> NavId {
        let cached = &mut self.portals[slot.index()];
        match *cached {
            Some(id) if tree.contains(id) => id,
            _ => {
                let id = tree.create_portal();
                tracing::debug!(?slot, %id, "materialized portal");
                *cached = Some(id);
                id
            }
        }
    }

    /// The container for `slot` if it has been materialized.
    #[must_use]
    pub fn portal(&self, slot: PortalSlot) -> Option<NavId> {
        self.portals[slot.index()]
    }

    /// Entries presented in `slot`; 0 when the slot was never used.
    #[must_use]
    pub fn count(&self, tree: &NavTree, slot: PortalSlot) -> usize {
        self.portal(slot).map_or(0, |id| tree.len(id))
    }

    /// Detach every materialized portal and forget it.
    ///
    /// Returns the entries that were still presented.
    pub fn teardown(&mut self, tree: &mut NavTree) -> Vec<ViewEntry> {
        let mut removed = Vec::new();
        for cached in &mut self.portals {
            if let Some(id) = cached.take()
                && let Ok(entries) = tree.detach(id)
            {
                removed.extend(entries);
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::NavOptions;
    use crate::view::View;

    struct Sheet;

    impl View for Sheet {
        fn component_name(&self) -> &str {
            "Sheet"
        }
    }

    #[test]
    fn portal_is_created_once() {
        let mut tree = NavTree::new();
        let mut portals = PortalRegistry::new();
        assert!(portals.portal(PortalSlot::Modal).is_none());

        let a = portals.portal_for(&mut tree, PortalSlot::Modal);
        let b = portals.portal_for(&mut tree, PortalSlot::Modal);
        assert_eq!(a, b);
        assert!(tree.is_portal(a));
        assert_ne!(a, portals.portal_for(&mut tree, PortalSlot::Default));
    }

    #[test]
    fn count_does_not_materialize() {
        let tree = NavTree::new();
        let portals = PortalRegistry::new();
        assert_eq!(portals.count(&tree, PortalSlot::Toast), 0);
        assert_eq!(tree.container_count(), 0);
    }

    #[test]
    fn count_tracks_entries() {
        let mut tree = NavTree::new();
        let mut portals = PortalRegistry::new();
        let id = portals.portal_for(&mut tree, PortalSlot::Default);
        tree.push(id, ViewEntry::new(Sheet), NavOptions::new())
            .unwrap();
        assert_eq!(portals.count(&tree, PortalSlot::Default), 1);
        assert_eq!(portals.count(&tree, PortalSlot::Modal), 0);
    }

    #[test]
    fn teardown_detaches_everything() {
        let mut tree = NavTree::new();
        let mut portals = PortalRegistry::new();
        for slot in PortalSlot::ALL {
            portals.portal_for(&mut tree, slot);
        }
        let id = portals.portal(PortalSlot::Loading).unwrap();
        tree.push(id, ViewEntry::new(Sheet), NavOptions::new())
            .unwrap();

        let removed = portals.teardown(&mut tree);
        assert_eq!(removed.len(), 1);
        assert_eq!(tree.container_count(), 0);
        assert!(portals.portal(PortalSlot::Loading).is_none());

        let again = portals.portal_for(&mut tree, PortalSlot::Loading);
        assert_ne!(again, id);
    }
}
