#![forbid(unsafe_code)]

//! Test harness for navkit.
//!
//! Recording and scriptable stand-ins for every collaborator the coordinator
//! talks to, plus a manually advanced clock. Everything is single-threaded
//! and inspected through `&self` accessors, so a fixture can be shared with
//! the app as an `Rc` and examined after the fact.
//!
//! ```ignore
//! let clock = ManualClock::new();
//! let platform = RecordingPlatform::new();
//! let transitions = ScriptedTransitioner::manual();
//! // build an App with these, press back, then:
//! transitions.settle_next();
//! assert_eq!(platform.exit_count(), 0);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use navkit_core::{
    AppRoot, BackButtonAction, ClickBlock, Clock, Completion, MenuController, NavError, NavResult,
    Platform, Settler, TitleService,
};
use navkit_tree::{Direction, TransitionKind, TransitionRequest, Transitioner, View, ViewEntry};
use web_time::Instant;

// =========================================================================
// Clock
// =========================================================================

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Cell<Duration>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            base: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        })
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    /// Time elapsed since creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

// =========================================================================
// Platform
// =========================================================================

/// Records back-button registrations and exit requests.
#[derive(Default)]
pub struct RecordingPlatform {
    action: RefCell<Option<BackButtonAction>>,
    registrations: Cell<usize>,
    exits: Cell<usize>,
}

impl RecordingPlatform {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Deliver a hardware back signal to the registered action.
    pub fn press_back(&self) -> Option<NavResult> {
        let action = self.action.borrow().clone();
        action.map(|action| action())
    }

    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.registrations.get()
    }

    #[must_use]
    pub fn has_action(&self) -> bool {
        self.action.borrow().is_some()
    }

    #[must_use]
    pub fn exit_count(&self) -> usize {
        self.exits.get()
    }
}

impl Platform for RecordingPlatform {
    fn register_back_button_action(&self, action: BackButtonAction) {
        self.registrations.set(self.registrations.get() + 1);
        *self.action.borrow_mut() = Some(action);
    }

    fn exit_app(&self) {
        self.exits.set(self.exits.get() + 1);
    }
}

// =========================================================================
// Menu
// =========================================================================

/// A menu whose open state is set by the test.
#[derive(Debug, Default)]
pub struct FakeMenu {
    open: Cell<bool>,
    closes: Cell<usize>,
    close_rejection: RefCell<Option<NavError>>,
}

impl FakeMenu {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn set_open(&self, open: bool) {
        self.open.set(open);
    }

    /// Make the next `close` calls report a rejected completion.
    pub fn reject_close_with(&self, err: NavError) {
        *self.close_rejection.borrow_mut() = Some(err);
    }

    #[must_use]
    pub fn close_count(&self) -> usize {
        self.closes.get()
    }
}

impl MenuController for FakeMenu {
    fn is_open(&self) -> bool {
        self.open.get()
    }

    fn close(&self) -> Completion {
        self.closes.set(self.closes.get() + 1);
        self.open.set(false);
        match self.close_rejection.borrow().clone() {
            Some(err) => Completion::rejected(err),
            None => Completion::done(),
        }
    }
}

// =========================================================================
// Click block, title, app root
// =========================================================================

/// Records every click-block activation.
#[derive(Debug, Default)]
pub struct RecordingClickBlock {
    calls: RefCell<Vec<(bool, Duration)>>,
}

impl RecordingClickBlock {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    #[must_use]
    pub fn calls(&self) -> Vec<(bool, Duration)> {
        self.calls.borrow().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<(bool, Duration)> {
        self.calls.borrow().last().copied()
    }
}

impl ClickBlock for RecordingClickBlock {
    fn activate(&self, should_block: bool, duration: Duration) {
        self.calls.borrow_mut().push((should_block, duration));
    }
}

/// Records every title written.
#[derive(Debug, Default)]
pub struct RecordingTitle {
    titles: RefCell<Vec<String>>,
}

impl RecordingTitle {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.titles.borrow().clone()
    }
}

impl TitleService for RecordingTitle {
    fn set_title(&self, title: &str) {
        self.titles.borrow_mut().push(title.to_string());
    }
}

/// Records class toggles and scroll-disable requests.
#[derive(Debug, Default)]
pub struct RecordingAppRoot {
    classes: RefCell<Vec<(String, bool)>>,
    scroll: RefCell<Vec<bool>>,
}

impl RecordingAppRoot {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    #[must_use]
    pub fn classes(&self) -> Vec<(String, bool)> {
        self.classes.borrow().clone()
    }

    #[must_use]
    pub fn scroll_calls(&self) -> Vec<bool> {
        self.scroll.borrow().clone()
    }
}

impl AppRoot for RecordingAppRoot {
    fn set_element_class(&self, class: &str, add: bool) {
        self.classes.borrow_mut().push((class.to_string(), add));
    }

    fn disable_scroll(&self, disable: bool) {
        self.scroll.borrow_mut().push(disable);
    }
}

// =========================================================================
// Transitions
// =========================================================================

/// How a [`ScriptedTransitioner`] settles the transitions it receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionMode {
    /// Resolve immediately.
    Instant,
    /// Keep pending until the test settles it.
    Manual,
    /// Reject immediately with the given reason.
    Reject(String),
}

/// What a transition looked like when it was requested.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTransition {
    pub nav: navkit_core::NavId,
    pub kind: TransitionKind,
    pub entering: Option<String>,
    pub leaving: Option<String>,
    pub removed: Vec<String>,
    pub direction: Option<Direction>,
    pub animation: Option<String>,
    pub keyboard_close: Option<bool>,
}

/// A transitioner whose settlement is scripted by the test.
#[derive(Debug)]
pub struct ScriptedTransitioner {
    mode: RefCell<TransitionMode>,
    log: RefCell<Vec<RecordedTransition>>,
    pending: RefCell<VecDeque<Settler>>,
}

impl ScriptedTransitioner {
    #[must_use]
    pub fn new(mode: TransitionMode) -> Rc<Self> {
        Rc::new(Self {
            mode: RefCell::new(mode),
            log: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
        })
    }

    #[must_use]
    pub fn instant() -> Rc<Self> {
        Self::new(TransitionMode::Instant)
    }

    #[must_use]
    pub fn manual() -> Rc<Self> {
        Self::new(TransitionMode::Manual)
    }

    pub fn set_mode(&self, mode: TransitionMode) {
        *self.mode.borrow_mut() = mode;
    }

    #[must_use]
    pub fn log(&self) -> Vec<RecordedTransition> {
        self.log.borrow().clone()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Resolve the oldest pending transition.
    pub fn settle_next(&self) -> bool {
        let next = self.pending.borrow_mut().pop_front();
        next.is_some_and(|s| s.resolve())
    }

    /// Reject the oldest pending transition.
    pub fn reject_next(&self, reason: &str) -> bool {
        let next = self.pending.borrow_mut().pop_front();
        next.is_some_and(|s| s.reject(NavError::TransitionRejected(reason.to_string())))
    }

    /// Drop the oldest pending settler, leaving its transition pending
    /// forever.
    pub fn abandon_next(&self) -> bool {
        self.pending.borrow_mut().pop_front().is_some()
    }

    /// Resolve every pending transition, oldest first.
    pub fn settle_all(&self) -> usize {
        let mut settled = 0;
        while self.settle_next() {
            settled += 1;
        }
        settled
    }
}

impl Transitioner for ScriptedTransitioner {
    fn transition(&self, request: TransitionRequest) -> Completion {
        tracing::trace!(nav = %request.nav, kind = ?request.kind, "scripted transition");
        self.log.borrow_mut().push(RecordedTransition {
            nav: request.nav,
            kind: request.kind,
            entering: request.entering.as_ref().map(|s| s.component.clone()),
            leaving: request.leaving.as_ref().map(|s| s.component.clone()),
            removed: request
                .removed
                .iter()
                .map(|e| e.component_name().to_string())
                .collect(),
            direction: request.opts.direction,
            animation: request.opts.animation.clone(),
            keyboard_close: request.opts.keyboard_close,
        });

        let mode = self.mode.borrow().clone();
        match mode {
            TransitionMode::Instant => Completion::done(),
            TransitionMode::Reject(reason) => {
                Completion::rejected(NavError::TransitionRejected(reason))
            }
            TransitionMode::Manual => {
                let (completion, settler) = Completion::pending();
                self.pending.borrow_mut().push_back(settler);
                completion
            }
        }
    }
}

// =========================================================================
// Views
// =========================================================================

/// A view identified only by name, with optional per-direction transitions.
#[derive(Debug, Clone)]
pub struct NamedView {
    name: String,
    forward: Option<String>,
    back: Option<String>,
}

impl NamedView {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            forward: None,
            back: None,
        }
    }

    #[must_use]
    pub fn with_transitions(mut self, forward: &str, back: &str) -> Self {
        self.forward = Some(forward.to_string());
        self.back = Some(back.to_string());
        self
    }
}

impl View for NamedView {
    fn component_name(&self) -> &str {
        &self.name
    }

    fn transition_name(&self, direction: Direction) -> String {
        let named = match direction {
            Direction::Forward => &self.forward,
            Direction::Back => &self.back,
        };
        named
            .clone()
            .unwrap_or_else(|| navkit_tree::DEFAULT_TRANSITION.to_string())
    }
}

/// A fresh entry for a [`NamedView`].
#[must_use]
pub fn named_view(name: &str) -> ViewEntry {
    ViewEntry::new(NamedView::new(name))
}

/// Component names of `nav`'s entries, bottom to top.
#[must_use]
pub fn stack_names(tree: &navkit_tree::NavTree, nav: navkit_core::NavId) -> Vec<String> {
    tree.get(nav)
        .map(|c| {
            c.entries()
                .iter()
                .map(|e| e.component_name().to_string())
                .collect()
        })
        .unwrap_or_default()
}
