#![forbid(unsafe_code)]

//! Contracts of the collaborators the coordinator drives but does not own.
//!
//! All methods take `&self`: implementations live on the UI thread and use
//! interior mutability where they need state.

use std::rc::Rc;
use std::time::Duration;

use crate::completion::{Completion, NavResult};

/// Handler invoked for every hardware/system back signal.
pub type BackButtonAction = Rc<dyn Fn() -> NavResult>;

/// Platform services: back-signal delivery and process exit.
pub trait Platform {
    /// Register the back-signal handler. Only the most recent registration
    /// is active.
    fn register_back_button_action(&self, action: BackButtonAction);

    /// Terminate the application.
    fn exit_app(&self);
}

/// Side menu queries.
pub trait MenuController {
    /// Whether any menu is currently open.
    fn is_open(&self) -> bool;

    /// Close the open menu.
    fn close(&self) -> Completion;
}

/// The input-blocking overlay shown while transitions run.
pub trait ClickBlock {
    /// Show (`should_block = true`) or hide the overlay; it removes itself
    /// after `duration`.
    fn activate(&self, should_block: bool, duration: Duration);
}

/// Document title sink.
pub trait TitleService {
    fn set_title(&self, title: &str);
}

/// The mounted application root element.
pub trait AppRoot {
    /// Add or remove a CSS-style class on the root element.
    fn set_element_class(&self, class: &str, add: bool);

    /// Toggle scrolling of the root content.
    fn disable_scroll(&self, disable: bool);
}
