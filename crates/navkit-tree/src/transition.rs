#![forbid(unsafe_code)]

//! The hand-off between tree bookkeeping and the rendering collaborator.
//!
//! Tree operations mutate the container synchronously and describe the
//! resulting visual change as a [`TransitionRequest`]. A [`Transitioner`]
//! plays it and returns the [`Completion`] that settles when it finishes.

use std::fmt;

use navkit_core::{Completion, NavId};

use crate::options::NavOptions;
use crate::view::{ViewEntry, ViewSnapshot};

/// The structural operation that produced a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Entries were inserted (push, insert, present).
    Insert,
    /// The last entry was removed.
    Pop,
}

/// A visual transition to play after a tree mutation.
pub struct TransitionRequest {
    /// The container that changed.
    pub nav: NavId,
    pub kind: TransitionKind,
    /// The view that became the top of the container, if the top changed.
    pub entering: Option<ViewSnapshot>,
    /// The view that stopped being the top, if the top changed.
    pub leaving: Option<ViewSnapshot>,
    /// Entries removed from the tree; ownership passes to the transitioner.
    pub removed: Vec<ViewEntry>,
    /// Entries that were attached for the first time.
    pub inserted: Vec<ViewSnapshot>,
    pub opts: NavOptions,
}

impl TransitionRequest {
    /// Whether the visible top of the container changed.
    #[must_use]
    pub fn changes_top(&self) -> bool {
        self.entering.is_some() || self.leaving.is_some()
    }
}

impl fmt::Debug for TransitionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionRequest")
            .field("nav", &self.nav)
            .field("kind", &self.kind)
            .field("entering", &self.entering)
            .field("leaving", &self.leaving)
            .field("removed", &self.removed.len())
            .field("inserted", &self.inserted.len())
            .field("opts", &self.opts)
            .finish()
    }
}

/// The rendering collaborator that plays transitions.
pub trait Transitioner {
    fn transition(&self, request: TransitionRequest) -> Completion;
}

impl<F> Transitioner for F
where
    F: Fn(TransitionRequest) -> Completion,
{
    fn transition(&self, request: TransitionRequest) -> Completion {
        self(request)
    }
}

/// Settles every transition immediately. Useful for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantTransitioner;

impl Transitioner for InstantTransitioner {
    fn transition(&self, _request: TransitionRequest) -> Completion {
        Completion::done()
    }
}
