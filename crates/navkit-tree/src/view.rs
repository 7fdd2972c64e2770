#![forbid(unsafe_code)]

//! Navigable views and the entries that hold them in a container.

use std::fmt;

use navkit_core::{NavId, ViewId};

use crate::options::{Direction, NavOptions};

/// Transition played when a view does not name one.
pub const DEFAULT_TRANSITION: &str = "slide";

/// The view collaborator: one navigable screen, page or overlay.
pub trait View {
    /// Stable name of the component this view renders.
    fn component_name(&self) -> &str;

    /// Name of the transition to play when moving in `direction`.
    fn transition_name(&self, _direction: Direction) -> String {
        DEFAULT_TRANSITION.to_string()
    }
}

/// A view held by a navigation container.
///
/// The entry records which container owns it and, for presented overlays,
/// the options to use when it is later popped.
pub struct ViewEntry {
    id: ViewId,
    view: Box<dyn View>,
    nav: Option<NavId>,
    leaving_opts: Option<NavOptions>,
}

impl ViewEntry {
    /// Wrap a view in a new entry with a fresh id.
    pub fn new(view: impl View + 'static) -> Self {
        Self::boxed(Box::new(view))
    }

    /// Wrap an already boxed view.
    pub fn boxed(view: Box<dyn View>) -> Self {
        Self {
            id: ViewId::next(),
            view,
            nav: None,
            leaving_opts: None,
        }
    }

    #[inline]
    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn component_name(&self) -> &str {
        self.view.component_name()
    }

    pub fn transition_name(&self, direction: Direction) -> String {
        self.view.transition_name(direction)
    }

    /// The container currently holding this entry.
    pub fn nav(&self) -> Option<NavId> {
        self.nav
    }

    /// Record the owning container.
    pub fn set_nav(&mut self, nav: NavId) {
        self.nav = Some(nav);
    }

    /// Options to use when this entry is popped.
    pub fn leaving_opts(&self) -> Option<&NavOptions> {
        self.leaving_opts.as_ref()
    }

    pub fn set_leaving_opts(&mut self, opts: NavOptions) {
        self.leaving_opts = Some(opts);
    }

    /// Borrow the wrapped view.
    pub fn view(&self) -> &dyn View {
        self.view.as_ref()
    }

    /// Lightweight description of this entry.
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            id: self.id,
            component: self.view.component_name().to_string(),
        }
    }
}

impl fmt::Debug for ViewEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewEntry")
            .field("id", &self.id)
            .field("component", &self.view.component_name())
            .field("nav", &self.nav)
            .field("leaving_opts", &self.leaving_opts)
            .finish()
    }
}

/// Identity of a view as seen by transitions and lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub id: ViewId,
    pub component: String,
}
