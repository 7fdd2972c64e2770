#![allow(dead_code)]

//! Shared wiring for the app integration tests.

use std::rc::Rc;

use navkit::{App, AppShell, NavConfig, NavId, NavOptions};
use navkit_harness::{
    FakeMenu, ManualClock, RecordingAppRoot, RecordingClickBlock, RecordingPlatform,
    RecordingTitle, ScriptedTransitioner, TransitionMode, named_view, stack_names,
};

pub struct Fixture {
    pub app: Rc<App>,
    pub shell: AppShell,
    pub platform: Rc<RecordingPlatform>,
    pub transitions: Rc<ScriptedTransitioner>,
    pub clock: Rc<ManualClock>,
    pub menu: Rc<FakeMenu>,
    pub click_block: Rc<RecordingClickBlock>,
    pub app_root: Rc<RecordingAppRoot>,
    pub title: Rc<RecordingTitle>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(NavConfig::default())
    }

    pub fn with_config(config: NavConfig) -> Self {
        let platform = RecordingPlatform::new();
        let transitions = ScriptedTransitioner::instant();
        let clock = ManualClock::new();
        let menu = FakeMenu::new();
        let click_block = RecordingClickBlock::new();
        let app_root = RecordingAppRoot::new();
        let title = RecordingTitle::new();

        let app = App::builder(platform.clone(), transitions.clone())
            .config(config)
            .clock(clock.clone())
            .menu(menu.clone())
            .title_service(title.clone())
            .build();
        let shell = AppShell::builder(&app)
            .app_root(app_root.clone())
            .click_block(click_block.clone())
            .mount()
            .expect("fresh app mounts");

        Self {
            app,
            shell,
            platform,
            transitions,
            clock,
            menu,
            click_block,
            app_root,
            title,
        }
    }

    pub fn root(&self) -> NavId {
        self.shell.root()
    }

    /// Push `names` onto `nav` with instantly settling transitions, then
    /// restore the previous transition mode.
    pub fn seed(&self, nav: NavId, names: &[&str]) {
        let log_len = self.transitions.log().len();
        for name in names {
            let done = self.app.push(nav, named_view(name), NavOptions::new());
            if done.is_pending() {
                self.transitions.settle_all();
            }
        }
        assert_eq!(self.transitions.log().len(), log_len + names.len());
        assert!(self.app.is_enabled());
    }

    pub fn stack(&self, nav: NavId) -> Vec<String> {
        self.app.with_tree(|tree| stack_names(tree, nav))
    }

    pub fn manual(&self) {
        self.transitions.set_mode(TransitionMode::Manual);
    }

    /// Child container under `parent`, made its active child.
    pub fn child(&self, parent: NavId) -> NavId {
        self.app.with_tree_mut(|tree| {
            let child = tree.create_child(parent).expect("parent exists");
            tree.set_active_child(parent, Some(child))
                .expect("fresh child");
            child
        })
    }
}
