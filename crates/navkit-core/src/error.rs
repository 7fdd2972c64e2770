#![forbid(unsafe_code)]

//! Error type shared by the navkit crates.
//!
//! Back-signal handling never fails: an absent root, a disabled gate, an
//! overlay or an exhausted parent chain all resolve to
//! [`NavResult::NothingToPop`](crate::NavResult::NothingToPop). `NavError`
//! covers tree mutations that violate structural invariants and rejected
//! transitions reported through a [`Completion`](crate::Completion).

use crate::ids::NavId;

/// Errors produced by navigation tree mutations and transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    /// The transition collaborator could not run or finish the transition.
    #[error("transition rejected: {0}")]
    TransitionRejected(String),

    /// The id does not name a live container.
    #[error("unknown navigation container {0}")]
    UnknownNav(NavId),

    /// `child` is not attached under `parent`.
    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: NavId, child: NavId },

    /// Attaching `nav` under `parent` would close a loop in the parent chain.
    #[error("attaching {nav} under {parent} would create a cycle")]
    Cycle { nav: NavId, parent: NavId },

    /// The container has no entries to pop.
    #[error("{0} has no entries to pop")]
    EmptyStack(NavId),

    /// Insert position outside `0..=len` (negative indices count from the end).
    #[error("insert index {index} out of range for {nav} (len {len})")]
    IndexOutOfRange { nav: NavId, index: isize, len: usize },

    /// An app shell is already mounted on this app.
    #[error("an app shell is already mounted")]
    AlreadyMounted,

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}
