#![forbid(unsafe_code)]

//! Transition options attached to navigation operations.

use std::time::Duration;

/// Direction of a navigation transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Moving deeper: push, insert at top, present.
    #[default]
    Forward,
    /// Moving back: pop, dismiss.
    Back,
}

impl Direction {
    /// Lowercase name, as used in transition identifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Back => "back",
        }
    }
}

/// Screen position of the input that triggered a navigation, used by
/// popover-style transitions to anchor themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerOrigin {
    pub x: f32,
    pub y: f32,
}

/// Options for a single navigation transition.
///
/// Unset fields defer to the transition collaborator's defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavOptions {
    /// Whether to animate at all.
    pub animate: Option<bool>,
    /// Named transition to play.
    pub animation: Option<String>,
    /// Transition direction.
    pub direction: Option<Direction>,
    /// Transition duration; also bounds how long input stays disabled.
    pub duration: Option<Duration>,
    /// Dismiss the on-screen keyboard before transitioning.
    pub keyboard_close: Option<bool>,
    /// The triggering input position, if any.
    pub ev: Option<PointerOrigin>,
}

impl NavOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_animation(mut self, animation: impl Into<String>) -> Self {
        self.animation = Some(animation.into());
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn with_animate(mut self, animate: bool) -> Self {
        self.animate = Some(animate);
        self
    }

    #[must_use]
    pub fn with_keyboard_close(mut self, close: bool) -> Self {
        self.keyboard_close = Some(close);
        self
    }

    #[must_use]
    pub fn with_ev(mut self, ev: PointerOrigin) -> Self {
        self.ev = Some(ev);
        self
    }

    /// The direction, defaulting to `fallback` when unset.
    #[must_use]
    pub fn direction_or(&self, fallback: Direction) -> Direction {
        self.direction.unwrap_or(fallback)
    }
}
