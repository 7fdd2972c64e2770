#![forbid(unsafe_code)]

//! Typed view lifecycle notifications.
//!
//! Each lifecycle event has its own [`LifecycleChannel`]. Subscribing returns
//! a [`Subscription`] guard; dropping the guard unsubscribes, so a
//! subscriber's interest ends with its own lifetime.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. A subscription dropped before an `emit` is not called by that emit.
//! 3. Subscribers may subscribe or unsubscribe from inside a callback; the
//!    change takes effect from the next `emit`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::ids::{NavId, ViewId};

type Subscribers<E> = RefCell<Vec<(u64, Rc<dyn Fn(&E)>)>>;

/// A single-threaded broadcast channel for one event type.
pub struct LifecycleChannel<E> {
    subscribers: Rc<Subscribers<E>>,
    next_id: Cell<u64>,
}

impl<E> Default for LifecycleChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for LifecycleChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleChannel")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<E> LifecycleChannel<E> {
    /// Create a channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(1),
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl<E: 'static> LifecycleChannel<E> {
    /// Register `callback`; it stays registered while the guard lives.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));

        let weak: Weak<Subscribers<E>> = Rc::downgrade(&self.subscribers);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(subs) = weak.upgrade() {
                    subs.borrow_mut().retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    /// Deliver `event` to every current subscriber.
    pub fn emit(&self, event: &E) {
        // Snapshot so callbacks can (un)subscribe without a borrow conflict.
        let snapshot: Vec<Rc<dyn Fn(&E)>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }
}

/// RAII guard that unsubscribes on drop.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Payload of every view lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEvent {
    /// Container the view belongs to (or belonged to, for leave/unload).
    pub nav: NavId,
    /// The view.
    pub view: ViewId,
    /// The view's component name.
    pub component: String,
}

/// Which lifecycle notification to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    DidLoad,
    WillEnter,
    DidEnter,
    WillLeave,
    DidLeave,
    WillUnload,
}

/// The full set of view lifecycle channels.
#[derive(Debug, Default)]
pub struct LifecycleEvents {
    pub view_did_load: LifecycleChannel<ViewEvent>,
    pub view_will_enter: LifecycleChannel<ViewEvent>,
    pub view_did_enter: LifecycleChannel<ViewEvent>,
    pub view_will_leave: LifecycleChannel<ViewEvent>,
    pub view_did_leave: LifecycleChannel<ViewEvent>,
    pub view_will_unload: LifecycleChannel<ViewEvent>,
}

impl LifecycleEvents {
    /// Create a set of empty channels.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The channel for `kind`.
    #[must_use]
    pub fn channel(&self, kind: LifecycleKind) -> &LifecycleChannel<ViewEvent> {
        match kind {
            LifecycleKind::DidLoad => &self.view_did_load,
            LifecycleKind::WillEnter => &self.view_will_enter,
            LifecycleKind::DidEnter => &self.view_did_enter,
            LifecycleKind::WillLeave => &self.view_will_leave,
            LifecycleKind::DidLeave => &self.view_did_leave,
            LifecycleKind::WillUnload => &self.view_will_unload,
        }
    }

    /// Emit `event` on the channel for `kind`.
    pub fn emit(&self, kind: LifecycleKind, event: &ViewEvent) {
        self.channel(kind).emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(n: u32) -> ViewEvent {
        ViewEvent {
            nav: NavId::from_raw(n),
            view: ViewId::next(),
            component: format!("Page{n}"),
        }
    }

    #[test]
    fn emit_reaches_subscribers_in_order() {
        let channel = LifecycleChannel::<ViewEvent>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _a = channel.subscribe(move |e| l1.borrow_mut().push(format!("a:{}", e.component)));
        let l2 = Rc::clone(&log);
        let _b = channel.subscribe(move |e| l2.borrow_mut().push(format!("b:{}", e.component)));

        channel.emit(&event(1));
        assert_eq!(*log.borrow(), vec!["a:Page1", "b:Page1"]);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let channel = LifecycleChannel::<u32>::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = channel.subscribe(move |v| h.set(h.get() + v));
        channel.emit(&2);
        drop(sub);
        channel.emit(&5);
        assert_eq!(hits.get(), 2);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn explicit_unsubscribe() {
        let channel = LifecycleChannel::<u32>::new();
        let sub = channel.subscribe(|_| {});
        assert_eq!(channel.subscriber_count(), 1);
        sub.unsubscribe();
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn subscribe_during_emit_is_deferred() {
        let channel = Rc::new(LifecycleChannel::<u32>::new());
        let late = Rc::new(RefCell::new(Vec::<Subscription>::new()));
        let hits = Rc::new(Cell::new(0));

        let ch = Rc::clone(&channel);
        let late_c = Rc::clone(&late);
        let hits_c = Rc::clone(&hits);
        let _outer = channel.subscribe(move |_| {
            let h = Rc::clone(&hits_c);
            late_c
                .borrow_mut()
                .push(ch.subscribe(move |_| h.set(h.get() + 1)));
        });

        channel.emit(&0);
        assert_eq!(hits.get(), 0);
        channel.emit(&0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn events_route_by_kind() {
        let events = LifecycleEvents::new();
        let seen = Rc::new(Cell::new(false));
        let s = Rc::clone(&seen);
        let _sub = events.view_did_leave.subscribe(move |_| s.set(true));

        events.emit(LifecycleKind::WillLeave, &event(2));
        assert!(!seen.get());
        events.emit(LifecycleKind::DidLeave, &event(2));
        assert!(seen.get());
    }

    #[test]
    fn subscription_outliving_channel_is_harmless() {
        let channel = LifecycleChannel::<u32>::new();
        let sub = channel.subscribe(|_| {});
        drop(channel);
        drop(sub);
    }
}
