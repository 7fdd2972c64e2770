#![forbid(unsafe_code)]

//! Leaf types for navkit.
//!
//! Everything here is independent of the navigation tree itself: the clock
//! and [`TemporalGate`](gate::TemporalGate) used to suppress input during
//! transitions, the promise-like [`Completion`](completion::Completion)
//! signal, configuration lookups, lifecycle channels and the contracts of the
//! external collaborators (platform, menu, click block, title, app root).

pub mod clock;
pub mod completion;
pub mod config;
pub mod error;
pub mod gate;
pub mod ids;
pub mod lifecycle;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod platform;

pub use clock::{Clock, SystemClock};
pub use completion::{Completion, CompletionState, NavResult, NoPopReason, Settler};
pub use config::{ConfigMap, ConfigSource, ConfigValue, NavConfig};
pub use error::NavError;
pub use gate::TemporalGate;
pub use ids::{NavId, ViewId};
pub use lifecycle::{LifecycleChannel, LifecycleEvents, LifecycleKind, Subscription, ViewEvent};
pub use platform::{AppRoot, BackButtonAction, ClickBlock, MenuController, Platform, TitleService};
