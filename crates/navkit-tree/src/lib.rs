#![forbid(unsafe_code)]

//! Navigation tree, overlay portals and back-stack resolution.
//!
//! - [`NavTree`]: arena of navigation containers with parent back-references.
//! - [`PortalRegistry`]: one overlay container per [`PortalSlot`].
//! - [`find_active_leaf`]: the container currently on screen.
//! - [`resolve`]: pop one entry from the nearest container that can spare it.
//!
//! Tree operations are synchronous bookkeeping; the visual side is handed to
//! a [`Transitioner`] as a [`TransitionRequest`].

pub mod options;
pub mod portal;
pub mod resolver;
pub mod transition;
pub mod tree;
pub mod view;
pub mod walker;

pub use options::{Direction, NavOptions, PointerOrigin};
pub use portal::{PortalRegistry, PortalSlot};
pub use resolver::{find_poppable, resolve, resolve_and_run};
pub use transition::{InstantTransitioner, TransitionKind, TransitionRequest, Transitioner};
pub use tree::{NavContainer, NavTree};
pub use view::{DEFAULT_TRANSITION, View, ViewEntry, ViewSnapshot};
pub use walker::find_active_leaf;
