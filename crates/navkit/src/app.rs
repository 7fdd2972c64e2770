#![forbid(unsafe_code)]

//! The application coordinator.
//!
//! [`App`] owns the navigation tree, the overlay portals and the temporal
//! gate, and turns back signals into at most one pop:
//!
//! ```text
//! back signal
//!   -> menu open?            close it                  (MenuClosed)
//!   -> gate disabled/no root                           (NothingToPop)
//!   -> alert/sheet showing                             (NothingToPop)
//!   -> modal showing?        resolve from modal leaf
//!      else                  resolve from root leaf    (Popped | NothingToPop)
//!   -> chain exhausted and exit configured: exit app
//! ```
//!
//! # Invariants
//!
//! 1. The tree is never borrowed while a collaborator runs: structural
//!    changes happen first, the transition is played after.
//! 2. Every transition that changes a container's top disables the gate
//!    until the most recent such transition settles, so a back signal
//!    arriving mid-transition pops nothing. A transition that never settles
//!    holds the gate for its grace window only.
//! 3. The app exits only when the active chain is exhausted; a signal that
//!    was suppressed (gate, missing root, overlay) never exits.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Transition rejected | Rejection surfaced through the completion; gate re-enabled |
//! | Transition never settles | Gate reopens once its grace window elapses |
//! | Unknown container on push/insert | Rejected completion with [`NavError::UnknownNav`] |
//! | App dropped while platform keeps the handler | Handler reports `NothingToPop(NoRoot)` |

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use navkit_core::gate::CLICK_BLOCK_BUFFER;
use navkit_core::{
    AppRoot, ClickBlock, Clock, Completion, ConfigSource, LifecycleEvents, LifecycleKind,
    MenuController, NavConfig, NavError, NavId, NavResult, NoPopReason, Platform, SystemClock,
    TemporalGate, TitleService, ViewEvent,
};
use navkit_tree::{
    Direction, NavOptions, NavTree, PortalRegistry, PortalSlot, TransitionRequest, Transitioner,
    ViewEntry, ViewSnapshot, find_active_leaf, resolve,
};
use tracing::{debug, trace, warn};

/// Builder for [`App`].
pub struct AppBuilder {
    platform: Rc<dyn Platform>,
    transitioner: Rc<dyn Transitioner>,
    config: NavConfig,
    clock: Rc<dyn Clock>,
    menu: Option<Rc<dyn MenuController>>,
    title: Option<Rc<dyn TitleService>>,
}

impl AppBuilder {
    /// Use `config` instead of the defaults.
    #[must_use]
    pub fn config(mut self, config: NavConfig) -> Self {
        self.config = config;
        self
    }

    /// Read the configuration from a key/value source.
    #[must_use]
    pub fn config_source(mut self, source: &dyn ConfigSource) -> Self {
        self.config = NavConfig::from_source(source);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attach the side menu that takes priority over navigation.
    #[must_use]
    pub fn menu(mut self, menu: Rc<dyn MenuController>) -> Self {
        self.menu = Some(menu);
        self
    }

    #[must_use]
    pub fn title_service(mut self, title: Rc<dyn TitleService>) -> Self {
        self.title = Some(title);
        self
    }

    /// Build the app and register its back-button handler with the platform.
    #[must_use]
    pub fn build(self) -> Rc<App> {
        let app = Rc::new_cyclic(|weak| App {
            me: weak.clone(),
            gate: RefCell::new(TemporalGate::new(self.clock)),
            config: self.config,
            platform: self.platform,
            transitioner: self.transitioner,
            menu: self.menu,
            title_service: self.title,
            click_block: RefCell::new(None),
            app_root: RefCell::new(None),
            tree: RefCell::new(NavTree::new()),
            portals: RefCell::new(PortalRegistry::new()),
            root: Cell::new(None),
            title: RefCell::new(String::new()),
            gate_epoch: Cell::new(0),
            lifecycle: LifecycleEvents::new(),
        });
        app.register_back_button();
        app
    }
}

/// The back-signal coordinator and presentation entry point.
pub struct App {
    me: Weak<App>,
    config: NavConfig,
    platform: Rc<dyn Platform>,
    transitioner: Rc<dyn Transitioner>,
    menu: Option<Rc<dyn MenuController>>,
    title_service: Option<Rc<dyn TitleService>>,
    click_block: RefCell<Option<Rc<dyn ClickBlock>>>,
    app_root: RefCell<Option<Rc<dyn AppRoot>>>,
    gate: RefCell<TemporalGate>,
    tree: RefCell<NavTree>,
    portals: RefCell<PortalRegistry>,
    root: Cell<Option<NavId>>,
    title: RefCell<String>,
    /// Bumped by every top-changing transition; only the latest one
    /// re-enables the gate when it settles.
    gate_epoch: Cell<u64>,
    lifecycle: LifecycleEvents,
}

impl App {
    /// Start building an app around its two required collaborators.
    #[must_use]
    pub fn builder(platform: Rc<dyn Platform>, transitioner: Rc<dyn Transitioner>) -> AppBuilder {
        AppBuilder {
            platform,
            transitioner,
            config: NavConfig::default(),
            clock: Rc::new(SystemClock),
            menu: None,
            title: None,
        }
    }

    fn register_back_button(&self) {
        let weak = self.me.clone();
        self.platform
            .register_back_button_action(Rc::new(move || {
                let Some(app) = weak.upgrade() else {
                    return NavResult::NothingToPop(NoPopReason::NoRoot);
                };
                let result = app.go_back();
                if let Some(completion) = result.completion() {
                    completion.on_settle(|outcome| {
                        if let Err(err) = outcome {
                            debug!(%err, "hardware go back cancelled");
                        }
                    });
                }
                result
            }));
    }

    #[must_use]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Back signal
    // ---------------------------------------------------------------------

    /// Handle one back signal: close the menu, pop once, or exit.
    pub fn go_back(&self) -> NavResult {
        let _span = tracing::debug_span!("go_back").entered();

        if let Some(menu) = &self.menu
            && menu.is_open()
        {
            debug!("back closes menu");
            return NavResult::MenuClosed(menu.close());
        }

        let result = self.nav_pop();
        if result.is_exhausted() && self.config.nav_exit_app {
            debug!("nothing left to pop, exiting app");
            self.platform.exit_app();
        }
        result
    }

    /// Pop one entry from the active chain, honoring the gate and overlays.
    pub fn nav_pop(&self) -> NavResult {
        let Some(root) = self.root.get() else {
            return NavResult::NothingToPop(NoPopReason::NoRoot);
        };
        if !self.is_enabled() {
            trace!("back suppressed, gate disabled");
            return NavResult::NothingToPop(NoPopReason::GateDisabled);
        }

        let request = {
            let mut tree = self.tree.borrow_mut();
            let portals = self.portals.borrow();
            if portals.count(&tree, PortalSlot::Default) > 0 {
                debug!("back suppressed, overlay showing");
                return NavResult::NothingToPop(NoPopReason::OverlayOpen);
            }
            let target = active_nav_in(&tree, &portals, Some(root));
            resolve(&mut tree, target)
        };

        match request {
            Some(request) => NavResult::Popped(self.run_transition(request)),
            None => NavResult::NothingToPop(NoPopReason::StackExhausted),
        }
    }

    // ---------------------------------------------------------------------
    // Stack building
    // ---------------------------------------------------------------------

    /// Present `view` on top of the overlay portal for `slot`.
    ///
    /// The view enters forward without closing the keyboard, and is set up
    /// to leave backward the same way when it is later popped.
    pub fn present(
        &self,
        mut view: ViewEntry,
        mut opts: NavOptions,
        slot: PortalSlot,
    ) -> Completion {
        let request = {
            let mut tree = self.tree.borrow_mut();
            let portal = self.portals.borrow_mut().portal_for(&mut tree, slot);
            view.set_nav(portal);

            opts.keyboard_close = Some(false);
            opts.direction = Some(Direction::Forward);
            if opts.animation.as_deref().is_none_or(str::is_empty) {
                opts.animation = Some(view.transition_name(Direction::Forward));
            }
            view.set_leaving_opts(NavOptions {
                keyboard_close: Some(false),
                direction: Some(Direction::Back),
                animation: Some(view.transition_name(Direction::Back)),
                ev: opts.ev,
                ..NavOptions::default()
            });

            tree.insert_pages(portal, -1, vec![view], opts)
        };
        self.play(request)
    }

    /// Append `view` to `nav`.
    pub fn push(&self, nav: NavId, view: ViewEntry, opts: NavOptions) -> Completion {
        self.insert_pages(nav, -1, vec![view], opts)
    }

    /// Insert `views` into `nav` at `index` (negative counts from the end).
    pub fn insert_pages(
        &self,
        nav: NavId,
        index: isize,
        views: Vec<ViewEntry>,
        opts: NavOptions,
    ) -> Completion {
        let request = self.tree.borrow_mut().insert_pages(nav, index, views, opts);
        self.play(request)
    }

    fn play(&self, request: Result<TransitionRequest, NavError>) -> Completion {
        match request {
            Ok(request) => self.run_transition(request),
            Err(err) => {
                debug!(%err, "navigation rejected");
                Completion::rejected(err)
            }
        }
    }

    fn run_transition(&self, request: TransitionRequest) -> Completion {
        let nav = request.nav;
        let changes_top = request.changes_top();
        let grace = request
            .opts
            .duration
            .unwrap_or_else(|| self.config.disable_grace());
        let entering = request.entering.clone();
        let leaving = request.leaving.clone();
        let removed: Vec<ViewSnapshot> = request.removed.iter().map(ViewEntry::snapshot).collect();

        for snapshot in &request.inserted {
            self.emit(LifecycleKind::DidLoad, nav, snapshot);
        }
        if let Some(snapshot) = &entering {
            self.emit(LifecycleKind::WillEnter, nav, snapshot);
        }
        if let Some(snapshot) = &leaving {
            self.emit(LifecycleKind::WillLeave, nav, snapshot);
        }

        trace!(
            %nav,
            kind = ?request.kind,
            direction = request.opts.direction_or(Direction::Forward).as_str(),
            "playing transition"
        );

        let epoch = changes_top.then(|| {
            let epoch = self.gate_epoch.get().wrapping_add(1);
            self.gate_epoch.set(epoch);
            self.set_enabled(false, Some(grace));
            epoch
        });

        let completion = self.transitioner.transition(request);

        let weak = self.me.clone();
        completion.on_settle(move |outcome| {
            let Some(app) = weak.upgrade() else {
                return;
            };
            if let Some(epoch) = epoch {
                app.finish_transition(epoch);
            }
            match outcome {
                Ok(()) => {
                    if let Some(snapshot) = &entering {
                        app.emit(LifecycleKind::DidEnter, nav, snapshot);
                    }
                    if let Some(snapshot) = &leaving {
                        app.emit(LifecycleKind::DidLeave, nav, snapshot);
                    }
                }
                Err(err) => debug!(%nav, %err, "transition rejected"),
            }
            for snapshot in &removed {
                app.emit(LifecycleKind::WillUnload, nav, snapshot);
            }
        });
        completion
    }

    /// Re-enable the gate unless a newer transition has taken it over. A
    /// transition that never settles is bounded by its grace window alone.
    fn finish_transition(&self, epoch: u64) {
        if self.gate_epoch.get() == epoch {
            self.set_enabled(true, None);
        } else {
            trace!(epoch, latest = self.gate_epoch.get(), "superseded transition settled");
        }
    }

    fn emit(&self, kind: LifecycleKind, nav: NavId, snapshot: &ViewSnapshot) {
        self.lifecycle.emit(
            kind,
            &ViewEvent {
                nav,
                view: snapshot.id,
                component: snapshot.component.clone(),
            },
        );
    }

    // ---------------------------------------------------------------------
    // Temporal gate
    // ---------------------------------------------------------------------

    /// Enable or disable user input. Disabling lasts `grace` (the configured
    /// grace window when `None`) unless re-enabled earlier.
    pub fn set_enabled(&self, enabled: bool, grace: Option<Duration>) {
        let grace = grace.unwrap_or_else(|| self.config.disable_grace());
        self.gate.borrow_mut().set_enabled(enabled, grace);

        let click_block = self.click_block.borrow().clone();
        if let Some(click_block) = click_block {
            if enabled {
                click_block.activate(false, CLICK_BLOCK_BUFFER);
            } else {
                click_block.activate(true, grace + CLICK_BLOCK_BUFFER);
            }
        }
    }

    /// [`set_enabled`](Self::set_enabled) with a raw millisecond grace;
    /// negative or non-finite values count as zero.
    pub fn set_enabled_for_millis(&self, enabled: bool, grace_ms: f64) {
        self.set_enabled(enabled, Some(navkit_core::gate::clamp_millis(grace_ms)));
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.gate.borrow().is_enabled()
    }

    /// Mark the app as actively scrolling for a short window.
    pub fn set_scrolling(&self) {
        self.gate.borrow_mut().set_scrolling();
    }

    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.gate.borrow_mut().is_scrolling()
    }

    // ---------------------------------------------------------------------
    // Root and active navigation
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn get_root_nav(&self) -> Option<NavId> {
        self.root.get()
    }

    /// Install the root container. Fails if one is already installed.
    pub(crate) fn set_root_nav(&self, nav: NavId) -> Result<(), NavError> {
        if self.root.get().is_some() {
            return Err(NavError::AlreadyMounted);
        }
        if !self.tree.borrow().contains(nav) {
            return Err(NavError::UnknownNav(nav));
        }
        self.root.set(Some(nav));
        Ok(())
    }

    pub(crate) fn clear_root_nav(&self) -> Option<NavId> {
        self.root.take()
    }

    /// The container currently on screen: the active leaf of the modal
    /// portal while it shows anything, else the active leaf of the root.
    #[must_use]
    pub fn get_active_nav(&self) -> Option<NavId> {
        let tree = self.tree.borrow();
        let portals = self.portals.borrow();
        active_nav_in(&tree, &portals, self.root.get())
    }

    /// Number of entries shown in the overlay portal for `slot`.
    #[must_use]
    pub fn portal_count(&self, slot: PortalSlot) -> usize {
        let tree = self.tree.borrow();
        self.portals.borrow().count(&tree, slot)
    }

    /// The portal container for `slot`, if it has been materialized.
    #[must_use]
    pub fn portal(&self, slot: PortalSlot) -> Option<NavId> {
        self.portals.borrow().portal(slot)
    }

    /// Read the navigation tree.
    pub fn with_tree<R>(&self, f: impl FnOnce(&NavTree) -> R) -> R {
        f(&self.tree.borrow())
    }

    /// Change the structure of the navigation tree (create containers,
    /// switch active children). Stack contents should go through
    /// [`push`](Self::push) and friends so transitions are played.
    pub fn with_tree_mut<R>(&self, f: impl FnOnce(&mut NavTree) -> R) -> R {
        f(&mut self.tree.borrow_mut())
    }

    // ---------------------------------------------------------------------
    // Shell collaborators
    // ---------------------------------------------------------------------

    /// Set the document title, skipping the service when it is unchanged.
    pub fn set_title(&self, title: &str) {
        if *self.title.borrow() == title {
            return;
        }
        *self.title.borrow_mut() = title.to_owned();
        if let Some(service) = &self.title_service {
            service.set_title(title);
        }
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    /// Add or remove a class on the mounted app root.
    pub fn set_element_class(&self, class: &str, add: bool) {
        let root = self.app_root.borrow().clone();
        match root {
            Some(root) => root.set_element_class(class, add),
            None => trace!(class, add, "no app root mounted"),
        }
    }

    /// Toggle content scrolling; only applies with scroll assist disabled
    /// in the configuration.
    pub fn set_disable_scroll(&self, disable: bool) {
        if !self.config.disable_scroll_assist {
            return;
        }
        let root = self.app_root.borrow().clone();
        if let Some(root) = root {
            root.disable_scroll(disable);
        }
    }

    /// View lifecycle channels fed by the transitions this app plays.
    #[must_use]
    pub fn lifecycle(&self) -> &LifecycleEvents {
        &self.lifecycle
    }

    pub(crate) fn attach(
        &self,
        app_root: Option<Rc<dyn AppRoot>>,
        click_block: Option<Rc<dyn ClickBlock>>,
    ) {
        *self.app_root.borrow_mut() = app_root;
        *self.click_block.borrow_mut() = click_block;
    }

    /// Detach the shell: drop the portals and the root container along with
    /// every entry they hold.
    pub(crate) fn teardown(&self, root: NavId) {
        let (removed, root_removed) = {
            let mut tree = self.tree.borrow_mut();
            let removed = self.portals.borrow_mut().teardown(&mut tree);
            let root_removed = tree.detach(root);
            (removed, root_removed)
        };
        let root_removed = root_removed.unwrap_or_else(|err| {
            warn!(%err, "root already detached at teardown");
            Vec::new()
        });
        if self.root.get() == Some(root) {
            self.clear_root_nav();
        }
        self.attach(None, None);

        for entry in removed.iter().chain(&root_removed) {
            let nav = entry.nav().unwrap_or(root);
            self.emit(LifecycleKind::WillUnload, nav, &entry.snapshot());
        }
        debug!(%root, unloaded = removed.len() + root_removed.len(), "shell torn down");
    }
}

fn active_nav_in(tree: &NavTree, portals: &PortalRegistry, root: Option<NavId>) -> Option<NavId> {
    if let Some(modal) = portals.portal(PortalSlot::Modal)
        && tree.len(modal) > 0
    {
        return find_active_leaf(tree, Some(modal));
    }
    find_active_leaf(tree, root)
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("root", &self.root.get())
            .field("gate_epoch", &self.gate_epoch.get())
            .field("has_menu", &self.menu.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navkit_tree::{InstantTransitioner, View};

    struct Exit(Cell<usize>);

    impl Platform for Exit {
        fn register_back_button_action(&self, _action: navkit_core::BackButtonAction) {}

        fn exit_app(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    struct Page(&'static str);

    impl View for Page {
        fn component_name(&self) -> &str {
            self.0
        }
    }

    fn app() -> (Rc<App>, Rc<Exit>) {
        let platform = Rc::new(Exit(Cell::new(0)));
        let app = App::builder(platform.clone(), Rc::new(InstantTransitioner)).build();
        (app, platform)
    }

    #[test]
    fn no_root_pops_nothing_and_never_exits() {
        let (app, platform) = app();
        let result = app.go_back();
        assert_eq!(result.no_pop_reason(), Some(NoPopReason::NoRoot));
        assert_eq!(platform.0.get(), 0);
    }

    #[test]
    fn root_can_only_be_set_once() {
        let (app, _) = app();
        let a = app.with_tree_mut(NavTree::create_root);
        let b = app.with_tree_mut(NavTree::create_root);
        app.set_root_nav(a).unwrap();
        assert_eq!(app.set_root_nav(b), Err(NavError::AlreadyMounted));
        assert_eq!(app.clear_root_nav(), Some(a));
        app.set_root_nav(b).unwrap();
        assert_eq!(app.get_root_nav(), Some(b));
    }

    #[test]
    fn unknown_root_is_rejected() {
        let (app, _) = app();
        let ghost = NavId::from_raw(999);
        assert_eq!(app.set_root_nav(ghost), Err(NavError::UnknownNav(ghost)));
    }

    #[test]
    fn instant_transition_leaves_gate_enabled() {
        let (app, _) = app();
        let root = app.with_tree_mut(NavTree::create_root);
        let done = app.push(root, ViewEntry::new(Page("a")), NavOptions::new());
        assert!(done.is_done());
        assert!(app.is_enabled());
        assert_eq!(app.gate_epoch.get(), 1);
    }

    #[test]
    fn push_to_unknown_nav_rejects() {
        let (app, _) = app();
        let ghost = NavId::from_raw(42);
        let c = app.push(ghost, ViewEntry::new(Page("a")), NavOptions::new());
        assert_eq!(c.rejection(), Some(NavError::UnknownNav(ghost)));
    }

    #[test]
    fn active_nav_prefers_non_empty_modal() {
        let (app, _) = app();
        let root = app.with_tree_mut(NavTree::create_root);
        app.set_root_nav(root).unwrap();
        assert_eq!(app.get_active_nav(), Some(root));

        app.present(ViewEntry::new(Page("m")), NavOptions::new(), PortalSlot::Modal);
        let modal = app.portal(PortalSlot::Modal);
        assert!(modal.is_some());
        assert_eq!(app.get_active_nav(), modal);
    }
}
