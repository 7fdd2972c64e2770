#![forbid(unsafe_code)]

//! Completion signals for asynchronous transitions.
//!
//! A [`Completion`] is the single-threaded, promise-like handle returned by
//! every operation that starts a visual transition (pop, insert, present,
//! menu close). The rendering collaborator owns the matching [`Settler`] and
//! settles it once the transition finishes.
//!
//! # Invariants
//!
//! 1. A completion settles at most once; later `resolve`/`reject` calls are
//!    ignored and return `false`.
//! 2. Callbacks registered with [`Completion::on_settle`] run exactly once, in
//!    registration order. Registering on an already settled completion runs
//!    the callback immediately.
//! 3. There is no cancellation: dropping the `Settler` leaves the completion
//!    pending forever.
//!
//! # Example
//!
//! ```
//! use navkit_core::completion::{Completion, CompletionState};
//!
//! let (completion, settler) = Completion::pending();
//! assert!(completion.is_pending());
//!
//! settler.resolve();
//! assert_eq!(completion.state(), CompletionState::Done);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::NavError;

type SettleCallback = Box<dyn FnOnce(Result<(), NavError>)>;

/// Observable state of a [`Completion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionState {
    /// The transition is still running.
    Pending,
    /// The transition settled successfully.
    Done,
    /// The transition was rejected by its collaborator.
    Rejected(NavError),
}

impl CompletionState {
    fn as_result(&self) -> Option<Result<(), NavError>> {
        match self {
            Self::Pending => None,
            Self::Done => Some(Ok(())),
            Self::Rejected(err) => Some(Err(err.clone())),
        }
    }
}

struct Inner {
    state: CompletionState,
    callbacks: Vec<SettleCallback>,
}

/// Handle on the outcome of a transition.
#[derive(Clone)]
pub struct Completion {
    inner: Rc<RefCell<Inner>>,
}

/// The settling side of a pending [`Completion`].
pub struct Settler {
    inner: Rc<RefCell<Inner>>,
}

impl Completion {
    fn with_state(state: CompletionState) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                state,
                callbacks: Vec::new(),
            })),
        }
    }

    /// A completion that has already settled successfully.
    #[must_use]
    pub fn done() -> Self {
        Self::with_state(CompletionState::Done)
    }

    /// A completion that has already been rejected.
    #[must_use]
    pub fn rejected(err: NavError) -> Self {
        Self::with_state(CompletionState::Rejected(err))
    }

    /// A pending completion together with the handle that settles it.
    #[must_use]
    pub fn pending() -> (Self, Settler) {
        let completion = Self::with_state(CompletionState::Pending);
        let settler = Settler {
            inner: Rc::clone(&completion.inner),
        };
        (completion, settler)
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> CompletionState {
        self.inner.borrow().state.clone()
    }

    /// Whether the transition is still running.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.inner.borrow().state, CompletionState::Pending)
    }

    /// Whether the transition settled successfully.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self.inner.borrow().state, CompletionState::Done)
    }

    /// The rejection reason, if the completion was rejected.
    #[must_use]
    pub fn rejection(&self) -> Option<NavError> {
        match &self.inner.borrow().state {
            CompletionState::Rejected(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Run `callback` once this completion settles.
    ///
    /// Runs immediately when the completion has already settled.
    pub fn on_settle(&self, callback: impl FnOnce(Result<(), NavError>) + 'static) {
        let result = {
            let mut inner = self.inner.borrow_mut();
            match inner.state.as_result() {
                Some(result) => result,
                None => {
                    inner.callbacks.push(Box::new(callback));
                    return;
                }
            }
        };
        callback(result);
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Completion")
            .field("state", &inner.state)
            .field("callbacks", &inner.callbacks.len())
            .finish()
    }
}

impl Settler {
    /// Settle successfully. Returns `false` if already settled.
    pub fn resolve(&self) -> bool {
        self.settle(CompletionState::Done)
    }

    /// Settle with a rejection. Returns `false` if already settled.
    pub fn reject(&self, err: NavError) -> bool {
        self.settle(CompletionState::Rejected(err))
    }

    /// Whether the paired completion is still pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.inner.borrow().state, CompletionState::Pending)
    }

    fn settle(&self, state: CompletionState) -> bool {
        let (callbacks, result) = {
            let mut inner = self.inner.borrow_mut();
            if inner.state != CompletionState::Pending {
                return false;
            }
            let result = state.as_result();
            inner.state = state;
            (std::mem::take(&mut inner.callbacks), result)
        };
        // Borrow released: callbacks may inspect or chain on this completion.
        if let Some(result) = result {
            for callback in callbacks {
                callback(result.clone());
            }
        }
        true
    }
}

impl fmt::Debug for Settler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settler")
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Why a back signal did not pop anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoPopReason {
    /// The temporal gate is disabled (a transition is in flight).
    GateDisabled,
    /// No root container is mounted.
    NoRoot,
    /// An alert or action sheet is showing and must dismiss itself.
    OverlayOpen,
    /// Every container on the active chain is at its minimum.
    StackExhausted,
}

/// Outcome of a back signal or a navigation pop.
#[derive(Debug, Clone)]
pub enum NavResult {
    /// One entry was popped; the completion settles when its leave
    /// transition does.
    Popped(Completion),
    /// An open menu absorbed the signal and is closing.
    MenuClosed(Completion),
    /// Nothing was popped.
    NothingToPop(NoPopReason),
}

impl NavResult {
    /// Whether no navigation happened, for whatever reason.
    #[must_use]
    pub fn is_nothing_to_pop(&self) -> bool {
        matches!(self, Self::NothingToPop(_))
    }

    /// Why nothing was popped, if nothing was.
    #[must_use]
    pub fn no_pop_reason(&self) -> Option<NoPopReason> {
        match self {
            Self::NothingToPop(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Whether the active chain had nothing left to pop. Only this outcome
    /// may lead to exiting the application.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::NothingToPop(NoPopReason::StackExhausted))
    }

    /// Whether an entry was popped.
    #[must_use]
    pub fn is_popped(&self) -> bool {
        matches!(self, Self::Popped(_))
    }

    /// The completion carried by this result, if any.
    #[must_use]
    pub fn completion(&self) -> Option<&Completion> {
        match self {
            Self::Popped(c) | Self::MenuClosed(c) => Some(c),
            Self::NothingToPop(_) => None,
        }
    }

    /// The rejection reason when the carried completion was rejected.
    #[must_use]
    pub fn rejection(&self) -> Option<NavError> {
        self.completion().and_then(Completion::rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn done_and_rejected_constructors() {
        assert!(Completion::done().is_done());
        let err = NavError::TransitionRejected("nope".into());
        let c = Completion::rejected(err.clone());
        assert_eq!(c.rejection(), Some(err));
        assert!(!c.is_pending());
    }

    #[test]
    fn settles_once() {
        let (c, s) = Completion::pending();
        assert!(s.resolve());
        assert!(!s.reject(NavError::TransitionRejected("late".into())));
        assert_eq!(c.state(), CompletionState::Done);
        assert!(!s.is_pending());
    }

    #[test]
    fn callbacks_run_in_order_on_settle() {
        let (c, s) = Completion::pending();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        c.on_settle(move |r| l1.borrow_mut().push(("first", r.is_ok())));
        let l2 = Rc::clone(&log);
        c.on_settle(move |r| l2.borrow_mut().push(("second", r.is_ok())));
        assert!(log.borrow().is_empty());

        s.reject(NavError::TransitionRejected("boom".into()));
        assert_eq!(*log.borrow(), vec![("first", false), ("second", false)]);
    }

    #[test]
    fn on_settle_after_settlement_runs_immediately() {
        let c = Completion::done();
        let hit = Rc::new(Cell::new(false));
        let h = Rc::clone(&hit);
        c.on_settle(move |r| h.set(r.is_ok()));
        assert!(hit.get());
    }

    #[test]
    fn callback_may_chain_on_same_completion() {
        let (c, s) = Completion::pending();
        let count = Rc::new(Cell::new(0));
        let inner_c = c.clone();
        let n = Rc::clone(&count);
        c.on_settle(move |_| {
            n.set(n.get() + 1);
            let n2 = Rc::clone(&n);
            inner_c.on_settle(move |_| n2.set(n2.get() + 1));
        });
        s.resolve();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn nav_result_accessors() {
        let idle = NavResult::NothingToPop(NoPopReason::GateDisabled);
        assert!(idle.is_nothing_to_pop());
        assert!(!idle.is_exhausted());
        assert!(idle.completion().is_none());
        assert_eq!(idle.no_pop_reason(), Some(NoPopReason::GateDisabled));
        assert!(NavResult::NothingToPop(NoPopReason::StackExhausted).is_exhausted());

        let popped = NavResult::Popped(Completion::done());
        assert!(popped.is_popped());
        assert!(popped.rejection().is_none());

        let err = NavError::TransitionRejected("x".into());
        let closed = NavResult::MenuClosed(Completion::rejected(err.clone()));
        assert_eq!(closed.rejection(), Some(err));
    }
}
