#![forbid(unsafe_code)]

//! Time-window suppression of input and scroll state.
//!
//! The [`TemporalGate`] tracks two windows:
//!
//! - **disabled until**: set while a transition runs so that a second back
//!   signal (or any other navigation command) is dropped instead of queued.
//! - **scrolling until**: refreshed on every scroll event; reads reset it
//!   lazily once it has elapsed.
//!
//! Both windows are `Option<Instant>`; `None` means inactive.
//!
//! # Invariants
//!
//! 1. `is_enabled()` is true iff no disabled-until instant is recorded or it
//!    is not after "now".
//! 2. `is_scrolling()` never reports an elapsed window and clears it on the
//!    first read after it elapses.
//! 3. Durations are never negative: millisecond inputs that are negative,
//!    NaN or infinite are clamped to zero.

use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

use crate::clock::Clock;

/// Default grace period for `set_enabled(false, ..)`.
pub const DEFAULT_DISABLE_GRACE: Duration = Duration::from_millis(700);

/// How long a scroll event keeps the app in the "scrolling" state.
pub const ACTIVE_SCROLLING_TIME: Duration = Duration::from_millis(100);

/// Extra time the click block stays up beyond the disabled window.
pub const CLICK_BLOCK_BUFFER: Duration = Duration::from_millis(64);

/// Convert a millisecond count into a [`Duration`], treating negative, NaN
/// and infinite values as zero.
#[must_use]
pub fn clamp_millis(millis: f64) -> Duration {
    if millis.is_finite() && millis > 0.0 {
        Duration::from_secs_f64(millis / 1000.0)
    } else {
        Duration::ZERO
    }
}

/// Input-disabled and scrolling windows read against a [`Clock`].
pub struct TemporalGate {
    clock: Rc<dyn Clock>,
    disabled_until: Option<Instant>,
    scrolling_until: Option<Instant>,
}

impl std::fmt::Debug for TemporalGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemporalGate")
            .field("disabled_until", &self.disabled_until)
            .field("scrolling_until", &self.scrolling_until)
            .finish_non_exhaustive()
    }
}

impl TemporalGate {
    /// Create an enabled, non-scrolling gate.
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            disabled_until: None,
            scrolling_until: None,
        }
    }

    /// Enable the gate, or disable it for `grace`.
    ///
    /// A disabled gate re-enables itself once `grace` elapses, with or
    /// without a matching `set_enabled(true, ..)`.
    pub fn set_enabled(&mut self, enabled: bool, grace: Duration) {
        self.disabled_until = if enabled {
            None
        } else {
            Some(self.clock.now() + grace)
        };
        tracing::trace!(enabled, grace_ms = grace.as_millis() as u64, "gate set_enabled");
    }

    /// [`set_enabled`](Self::set_enabled) with an unchecked millisecond count.
    pub fn set_enabled_for_millis(&mut self, enabled: bool, millis: f64) {
        self.set_enabled(enabled, clamp_millis(millis));
    }

    /// Whether navigation commands are currently accepted.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        match self.disabled_until {
            None => true,
            Some(until) => until <= self.clock.now(),
        }
    }

    /// Record a scroll event.
    pub fn set_scrolling(&mut self) {
        self.scrolling_until = Some(self.clock.now() + ACTIVE_SCROLLING_TIME);
    }

    /// Whether a scroll happened within [`ACTIVE_SCROLLING_TIME`].
    ///
    /// Clears the scrolling window once it has elapsed.
    pub fn is_scrolling(&mut self) -> bool {
        let Some(until) = self.scrolling_until else {
            return false;
        };
        if until <= self.clock.now() {
            self.scrolling_until = None;
            return false;
        }
        true
    }

    /// The recorded disabled-until instant, if any.
    #[must_use]
    pub fn disabled_until(&self) -> Option<Instant> {
        self.disabled_until
    }

    /// The recorded scrolling-until instant, if any.
    #[must_use]
    pub fn scrolling_until(&self) -> Option<Instant> {
        self.scrolling_until
    }
}
