#![forbid(unsafe_code)]

//! Back-signal coordination for nested navigation stacks.
//!
//! This crate provides:
//! - [`App`], which routes a hardware/system back signal to the menu, the
//!   nearest poppable navigation container or application exit
//! - [`App::present`] for pushing views into overlay portals
//! - [`AppShell`], the guard for mounting an app onto a UI shell
//!
//! The tree, portal and resolver types live in `navkit-tree`; the gate,
//! completion, configuration and collaborator contracts in `navkit-core`.
//! Their commonly used items are re-exported here.

pub mod app;
pub mod shell;

pub use app::{App, AppBuilder};
pub use shell::{AppShell, ShellBuilder};

pub use navkit_core::{
    AppRoot, ClickBlock, Clock, Completion, CompletionState, ConfigMap, ConfigSource,
    LifecycleKind, MenuController, NavConfig, NavError, NavId, NavResult, NoPopReason, Platform,
    Settler, Subscription, SystemClock, TitleService, ViewEvent,
};
pub use navkit_tree::{
    Direction, InstantTransitioner, NavOptions, NavTree, PointerOrigin, PortalSlot,
    TransitionKind, TransitionRequest, Transitioner, View, ViewEntry,
};

#[cfg(feature = "tracing-json")]
pub use navkit_core::logging::init_tracing;

/// The types most applications need.
pub mod prelude {
    pub use crate::{
        App, AppShell, Completion, Direction, NavConfig, NavError, NavId, NavOptions, NavResult,
        PortalSlot, Transitioner, View, ViewEntry,
    };
}
