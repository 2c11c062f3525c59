//! Process-wide container resize notifications.
//!
//! The host forwards window resizes to [`notify_resize`]; every mounted
//! engine holds one [`ResizeSubscription`] and picks up the latest size on
//! its next event or tick. Dropping the subscription deregisters it.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Zero-area or non-finite sizes are not renderable.
    pub fn is_renderable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

type Pending = Rc<Cell<Option<ContainerSize>>>;

#[derive(Default)]
struct ResizeHub {
    next_id: u64,
    listeners: BTreeMap<u64, Pending>,
}

thread_local! {
    static HUB: RefCell<ResizeHub> = RefCell::new(ResizeHub::default());
}

/// TLS access that degrades to a default during thread teardown instead of panicking.
fn with_hub<F, R>(f: F) -> R
where
    F: FnOnce(&mut ResizeHub) -> R,
    R: Default,
{
    HUB.try_with(|hub| f(&mut hub.borrow_mut()))
        .unwrap_or_default()
}

/// Registration with the thread's resize hub.
#[derive(Debug)]
pub struct ResizeSubscription {
    id: u64,
    pending: Pending,
}

impl ResizeSubscription {
    pub fn subscribe() -> Self {
        let pending: Pending = Rc::new(Cell::new(None));
        let slot = Rc::clone(&pending);
        let id = with_hub(move |hub| {
            let id = hub.next_id;
            hub.next_id += 1;
            hub.listeners.insert(id, slot);
            id
        });
        Self { id, pending }
    }

    /// Latest size delivered since the last call. Intermediate sizes are coalesced.
    pub fn take_pending(&self) -> Option<ContainerSize> {
        self.pending.take()
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        let id = self.id;
        with_hub(|hub| {
            hub.listeners.remove(&id);
        });
    }
}

/// Delivers a new container size to every subscriber on this thread.
/// Returns the number of subscribers notified.
pub fn notify_resize(size: ContainerSize) -> usize {
    with_hub(|hub| {
        for pending in hub.listeners.values() {
            pending.set(Some(size));
        }
        hub.listeners.len()
    })
}

pub fn listener_count() -> usize {
    with_hub(|hub| hub.listeners.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriptions_register_and_drop() {
        assert_eq!(listener_count(), 0);
        let a = ResizeSubscription::subscribe();
        let b = ResizeSubscription::subscribe();
        assert_eq!(listener_count(), 2);
        drop(a);
        assert_eq!(listener_count(), 1);
        drop(b);
        assert_eq!(listener_count(), 0);
    }

    #[test]
    fn notifications_coalesce_to_latest() {
        let sub = ResizeSubscription::subscribe();
        assert_eq!(sub.take_pending(), None);
        assert_eq!(notify_resize(ContainerSize::new(640.0, 480.0)), 1);
        notify_resize(ContainerSize::new(1024.0, 768.0));
        assert_eq!(sub.take_pending(), Some(ContainerSize::new(1024.0, 768.0)));
        assert_eq!(sub.take_pending(), None);
    }

    #[test]
    fn renderable_sizes() {
        assert!(ContainerSize::new(1.0, 1.0).is_renderable());
        assert!(!ContainerSize::new(0.0, 600.0).is_renderable());
        assert!(!ContainerSize::new(f64::NAN, 600.0).is_renderable());
    }
}
