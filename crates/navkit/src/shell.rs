#![forbid(unsafe_code)]

//! Mounting an [`App`] onto a UI shell.
//!
//! An [`AppShell`] is the guard for one mount: it creates the root
//! container, installs it as the app's root and attaches the shell-provided
//! collaborators. Unmounting (explicitly or by drop) tears the overlay
//! portals and the root container down, so a later mount starts clean.
//!
//! ```ignore
//! let shell = AppShell::builder(&app)
//!     .app_root(root_element)
//!     .click_block(click_block)
//!     .mount()?;
//! app.push(shell.root(), ViewEntry::new(Home), NavOptions::new());
//! ```

use std::rc::Rc;

use navkit_core::{AppRoot, ClickBlock, NavError, NavId};
use navkit_tree::NavTree;

use crate::app::App;

/// Configures a mount before it happens.
#[must_use = "a shell is only mounted by calling `mount`"]
pub struct ShellBuilder {
    app: Rc<App>,
    app_root: Option<Rc<dyn AppRoot>>,
    click_block: Option<Rc<dyn ClickBlock>>,
}

impl ShellBuilder {
    pub fn app_root(mut self, app_root: Rc<dyn AppRoot>) -> Self {
        self.app_root = Some(app_root);
        self
    }

    pub fn click_block(mut self, click_block: Rc<dyn ClickBlock>) -> Self {
        self.click_block = Some(click_block);
        self
    }

    /// Create the root container and mount.
    ///
    /// Fails with [`NavError::AlreadyMounted`] while another shell is
    /// mounted on the same app.
    pub fn mount(self) -> Result<AppShell, NavError> {
        if self.app.get_root_nav().is_some() {
            return Err(NavError::AlreadyMounted);
        }
        let root = self.app.with_tree_mut(NavTree::create_root);
        self.app.set_root_nav(root)?;
        self.app.attach(self.app_root, self.click_block);
        tracing::debug!(%root, "shell mounted");
        Ok(AppShell {
            app: self.app,
            root,
            mounted: true,
        })
    }
}

/// A mounted shell. Dropping it unmounts.
pub struct AppShell {
    app: Rc<App>,
    root: NavId,
    mounted: bool,
}

impl AppShell {
    pub fn builder(app: &Rc<App>) -> ShellBuilder {
        ShellBuilder {
            app: Rc::clone(app),
            app_root: None,
            click_block: None,
        }
    }

    /// Mount with no shell collaborators.
    pub fn mount(app: &Rc<App>) -> Result<Self, NavError> {
        Self::builder(app).mount()
    }

    /// The root container created for this mount.
    #[must_use]
    pub fn root(&self) -> NavId {
        self.root
    }

    #[must_use]
    pub fn app(&self) -> &Rc<App> {
        &self.app
    }

    /// Unmount now instead of at drop.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if std::mem::take(&mut self.mounted) {
            self.app.teardown(self.root);
        }
    }
}

impl Drop for AppShell {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for AppShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppShell")
            .field("root", &self.root)
            .field("mounted", &self.mounted)
            .finish()
    }
}
