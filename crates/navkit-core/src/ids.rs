#![forbid(unsafe_code)]

//! Identifiers for navigation containers and view entries.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for unique view IDs.
static VIEW_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of a navigation container inside a `NavTree` arena.
///
/// Ids are allocated by the tree and never reused while the tree lives, so a
/// stale id simply fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavId(u32);

impl NavId {
    /// Wrap a raw arena index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw index value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NavId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nav#{}", self.0)
    }
}

/// Unique identifier for a view entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    /// Allocate a new process-unique view ID.
    pub fn next() -> Self {
        Self(VIEW_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_ids_are_unique() {
        let a = ViewId::next();
        let b = ViewId::next();
        assert_ne!(a, b);
        assert!(b.id() > a.id());
    }

    #[test]
    fn nav_id_display() {
        assert_eq!(NavId::from_raw(7).to_string(), "nav#7");
        assert_eq!(NavId::from_raw(7).raw(), 7);
    }
}
