#![forbid(unsafe_code)]

//! Arena of navigation containers.
//!
//! Containers are addressed by [`NavId`]. A container's parent is a plain id
//! (a non-owning back-reference); children are owned by the arena, not by
//! their parent.
//!
//! # Invariants
//!
//! 1. `active_child`, when set, is one of the container's own children.
//! 2. The parent chain is acyclic. A container gains a parent only at
//!    creation or through [`NavTree::reparent`], which rejects any parent
//!    that is the container itself or one of its descendants.
//! 3. Ids are never reused, so a stale id resolves to nothing.
//! 4. Every entry in a container has `nav()` equal to that container.
//!
//! # Failure Modes
//!
//! - Unknown ids: [`NavError::UnknownNav`].
//! - `set_active_child` with a non-child: [`NavError::NotAChild`].
//! - `pop` on an empty container: [`NavError::EmptyStack`].
//! - Insert positions outside the stack: [`NavError::IndexOutOfRange`].

use ahash::AHashMap;
use navkit_core::{NavError, NavId};

use crate::options::{Direction, NavOptions};
use crate::transition::{TransitionKind, TransitionRequest};
use crate::view::{ViewEntry, ViewSnapshot};

/// One navigation stack in the tree.
#[derive(Debug)]
pub struct NavContainer {
    id: NavId,
    parent: Option<NavId>,
    children: Vec<NavId>,
    active_child: Option<NavId>,
    is_portal: bool,
    entries: Vec<ViewEntry>,
}

impl NavContainer {
    fn new(id: NavId, parent: Option<NavId>, is_portal: bool) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            active_child: None,
            is_portal,
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> NavId {
        self.id
    }

    #[inline]
    pub fn parent(&self) -> Option<NavId> {
        self.parent
    }

    pub fn children(&self) -> &[NavId] {
        &self.children
    }

    /// The child container currently visible, if any.
    #[inline]
    pub fn active_child(&self) -> Option<NavId> {
        self.active_child
    }

    /// Overlay-style container (modal host, action sheet host, ...).
    #[inline]
    pub fn is_portal(&self) -> bool {
        self.is_portal
    }

    /// Number of entries in the stack.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries bottom to top.
    pub fn entries(&self) -> &[ViewEntry] {
        &self.entries
    }

    /// The visible (last) entry.
    pub fn top(&self) -> Option<&ViewEntry> {
        self.entries.last()
    }

    /// Whether a back signal may pop from this container.
    ///
    /// Ordinary stacks keep their last entry; a portal's natural state is
    /// empty, so any entry at all is poppable.
    #[inline]
    pub fn can_pop(&self) -> bool {
        let len = self.entries.len();
        len > 1 || (self.is_portal && len > 0)
    }
}

/// Arena owning every navigation container.
#[derive(Debug, Default)]
pub struct NavTree {
    containers: AHashMap<NavId, NavContainer>,
    next_id: u32,
}

impl NavTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, parent: Option<NavId>, is_portal: bool) -> NavId {
        let id = NavId::from_raw(self.next_id);
        self.next_id += 1;
        self.containers
            .insert(id, NavContainer::new(id, parent, is_portal));
        id
    }

    fn container_mut(&mut self, nav: NavId) -> Result<&mut NavContainer, NavError> {
        self.containers
            .get_mut(&nav)
            .ok_or(NavError::UnknownNav(nav))
    }

    // --- Structure ---

    /// Create a parentless, non-portal container.
    pub fn create_root(&mut self) -> NavId {
        self.alloc(None, false)
    }

    /// Create a parentless portal container.
    pub fn create_portal(&mut self) -> NavId {
        self.alloc(None, true)
    }

    /// Create a container nested under `parent`.
    ///
    /// The new child is not made active; see [`set_active_child`](Self::set_active_child).
    pub fn create_child(&mut self, parent: NavId) -> Result<NavId, NavError> {
        if !self.contains(parent) {
            return Err(NavError::UnknownNav(parent));
        }
        let id = self.alloc(Some(parent), false);
        self.container_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Move `nav` under `new_parent` (or make it parentless).
    ///
    /// Fails with [`NavError::Cycle`] if `new_parent` is `nav` or one of its
    /// descendants. If `nav` was the old parent's active child, that parent
    /// no longer has an active child.
    pub fn reparent(&mut self, nav: NavId, new_parent: Option<NavId>) -> Result<(), NavError> {
        if !self.contains(nav) {
            return Err(NavError::UnknownNav(nav));
        }
        if let Some(parent) = new_parent {
            if !self.contains(parent) {
                return Err(NavError::UnknownNav(parent));
            }
            if parent == nav || self.is_ancestor(nav, parent) {
                return Err(NavError::Cycle { nav, parent });
            }
        }

        if let Some(old) = self.containers.get(&nav).and_then(|c| c.parent) {
            self.unlink_from_parent(old, nav);
        }
        self.container_mut(nav)?.parent = new_parent;
        if let Some(parent) = new_parent {
            self.container_mut(parent)?.children.push(nav);
        }
        Ok(())
    }

    /// Remove `nav` and all of its descendants.
    ///
    /// Returns the entries that were held by the removed containers, in
    /// depth-first order.
    pub fn detach(&mut self, nav: NavId) -> Result<Vec<ViewEntry>, NavError> {
        let parent = self
            .containers
            .get(&nav)
            .ok_or(NavError::UnknownNav(nav))?
            .parent;
        if let Some(parent) = parent {
            self.unlink_from_parent(parent, nav);
        }

        let mut removed = Vec::new();
        let mut pending = vec![nav];
        while let Some(id) = pending.pop() {
            if let Some(container) = self.containers.remove(&id) {
                pending.extend(container.children.iter().rev().copied());
                removed.extend(container.entries);
            }
        }
        tracing::debug!(%nav, entries = removed.len(), "detached nav");
        Ok(removed)
    }

    fn unlink_from_parent(&mut self, parent: NavId, child: NavId) {
        if let Some(p) = self.containers.get_mut(&parent) {
            p.children.retain(|c| *c != child);
            if p.active_child == Some(child) {
                p.active_child = None;
            }
        }
    }

    /// Select which child of `parent` is visible (`None` clears it).
    pub fn set_active_child(
        &mut self,
        parent: NavId,
        child: Option<NavId>,
    ) -> Result<(), NavError> {
        let container = self.container_mut(parent)?;
        if let Some(child) = child
            && !container.children.contains(&child)
        {
            return Err(NavError::NotAChild { parent, child });
        }
        container.active_child = child;
        Ok(())
    }

    // --- Queries ---

    #[must_use]
    pub fn get(&self, nav: NavId) -> Option<&NavContainer> {
        self.containers.get(&nav)
    }

    #[must_use]
    pub fn contains(&self, nav: NavId) -> bool {
        self.containers.contains_key(&nav)
    }

    /// Number of live containers.
    #[must_use]
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Entry count of `nav`; 0 for unknown ids.
    #[must_use]
    pub fn len(&self, nav: NavId) -> usize {
        self.get(nav).map_or(0, NavContainer::len)
    }

    #[must_use]
    pub fn parent(&self, nav: NavId) -> Option<NavId> {
        self.get(nav).and_then(NavContainer::parent)
    }

    #[must_use]
    pub fn active_child(&self, nav: NavId) -> Option<NavId> {
        self.get(nav).and_then(NavContainer::active_child)
    }

    #[must_use]
    pub fn is_portal(&self, nav: NavId) -> bool {
        self.get(nav).is_some_and(NavContainer::is_portal)
    }

    /// Parent chain of `nav`, nearest first, excluding `nav` itself.
    pub fn ancestors(&self, nav: NavId) -> impl Iterator<Item = NavId> + '_ {
        std::iter::successors(self.parent(nav), move |id| self.parent(*id))
    }

    /// Whether `ancestor` appears on the parent chain of `nav`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NavId, nav: NavId) -> bool {
        self.ancestors(nav).any(|id| id == ancestor)
    }

    // --- Stack operations ---

    /// Insert `views` at `index`; negative indices count from the end, so
    /// `-1` appends.
    ///
    /// Returns the transition describing the change. When the top entry
    /// changes the request names the entering and leaving views and defaults
    /// its direction to [`Direction::Forward`].
    pub fn insert_pages(
        &mut self,
        nav: NavId,
        index: isize,
        mut views: Vec<ViewEntry>,
        mut opts: NavOptions,
    ) -> Result<TransitionRequest, NavError> {
        let container = self.container_mut(nav)?;
        let len = container.entries.len();
        let at =
            resolve_index(index, len).ok_or(NavError::IndexOutOfRange { nav, index, len })?;

        let previous_top = container.top().map(ViewEntry::snapshot);
        for view in &mut views {
            view.set_nav(nav);
        }
        let inserted: Vec<ViewSnapshot> = views.iter().map(ViewEntry::snapshot).collect();
        let tail = container.entries.split_off(at);
        container.entries.extend(views);
        container.entries.extend(tail);
        let new_top = container.top().map(ViewEntry::snapshot);

        let top_changed =
            previous_top.as_ref().map(|s| s.id) != new_top.as_ref().map(|s| s.id);
        let (entering, leaving) = if top_changed {
            (new_top, previous_top)
        } else {
            (None, None)
        };
        opts.direction = Some(opts.direction_or(Direction::Forward));

        Ok(TransitionRequest {
            nav,
            kind: TransitionKind::Insert,
            entering,
            leaving,
            removed: Vec::new(),
            inserted,
            opts,
        })
    }

    /// Append a single view.
    pub fn push(
        &mut self,
        nav: NavId,
        view: ViewEntry,
        opts: NavOptions,
    ) -> Result<TransitionRequest, NavError> {
        self.insert_pages(nav, -1, vec![view], opts)
    }

    /// Remove the last entry of `nav`.
    ///
    /// The popped entry's own leaving options (set when it was presented)
    /// take precedence over `opts`; the direction defaults to
    /// [`Direction::Back`]. The entry moves into the returned request.
    pub fn pop(&mut self, nav: NavId, opts: NavOptions) -> Result<TransitionRequest, NavError> {
        let container = self.container_mut(nav)?;
        let removed = container.entries.pop().ok_or(NavError::EmptyStack(nav))?;
        let entering = container.top().map(ViewEntry::snapshot);

        let mut opts = removed.leaving_opts().cloned().unwrap_or(opts);
        opts.direction = Some(opts.direction_or(Direction::Back));

        Ok(TransitionRequest {
            nav,
            kind: TransitionKind::Pop,
            entering,
            leaving: Some(removed.snapshot()),
            removed: vec![removed],
            inserted: Vec::new(),
            opts,
        })
    }
}

/// Map a possibly negative insert index onto `0..=len`.
fn resolve_index(index: isize, len: usize) -> Option<usize> {
    if index >= 0 {
        let at = index.unsigned_abs();
        (at <= len).then_some(at)
    } else {
        len.checked_sub(index.unsigned_abs() - 1)
    }
}
