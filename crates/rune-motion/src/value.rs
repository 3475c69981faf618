//! Value stores for animatable properties.
//!
//! A [`MotionValue`] is a shared, observable cell. Hosts create one per
//! property they want to read back (or pass into several nodes), the engine
//! writes it from animation tasks, and subscribers are notified on change.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::types::AnimatableValue;

/// Callback invoked with the new value whenever a store changes.
pub type ValueListener = Box<dyn FnMut(&AnimatableValue) + Send>;

/// Handle returned by [`MotionValue::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Shared {
    value: Mutex<AnimatableValue>,
    listeners: Mutex<Vec<(SubscriptionId, ValueListener)>>,
    next_subscription: AtomicU64,
}

/// Shared observable store for one animatable property.
///
/// Cloning a `MotionValue` clones the handle, not the value.
#[derive(Clone)]
pub struct MotionValue {
    shared: Arc<Shared>,
}

impl fmt::Debug for MotionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionValue")
            .field("value", &*self.shared.value.lock())
            .field("listeners", &self.shared.listeners.lock().len())
            .finish()
    }
}

impl MotionValue {
    /// Create a store holding `initial`.
    pub fn new(initial: impl Into<AnimatableValue>) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: Mutex::new(initial.into()),
                listeners: Mutex::new(Vec::new()),
                next_subscription: AtomicU64::new(1),
            }),
        }
    }

    /// Current value.
    pub fn get(&self) -> AnimatableValue {
        self.shared.value.lock().clone()
    }

    /// Current value as a number, if it is one.
    pub fn get_f64(&self) -> Option<f64> {
        self.shared.value.lock().as_f64()
    }

    /// Replace the value, notifying subscribers if it changed.
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: impl Into<AnimatableValue>) -> bool {
        let value = value.into();
        {
            let mut current = self.shared.value.lock();
            if *current == value {
                return false;
            }
            *current = value.clone();
        }

        // Listeners are moved out while they run so one of them may read or
        // write this store without deadlocking.
        let mut running = std::mem::take(&mut *self.shared.listeners.lock());
        for (_, listener) in running.iter_mut() {
            listener(&value);
        }
        let mut listeners = self.shared.listeners.lock();
        running.append(&mut listeners);
        *listeners = running;
        true
    }

    /// Register a change listener.
    pub fn subscribe(&self, listener: impl FnMut(&AnimatableValue) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.shared.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.shared.listeners.lock().push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.shared.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.lock().len()
    }

    /// Whether two handles refer to the same store.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_get_set() {
        let opacity = MotionValue::new(1.0);
        assert_eq!(opacity.get_f64(), Some(1.0));
        assert!(opacity.set(0.5));
        assert_eq!(opacity.get(), AnimatableValue::F64 { value: 0.5 });
        // Same value is not a change
        assert!(!opacity.set(0.5));
    }

    #[test]
    fn test_clone_shares_store() {
        let a = MotionValue::new(1.0);
        let b = a.clone();
        b.set(2.0);
        assert_eq!(a.get_f64(), Some(2.0));
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&MotionValue::new(2.0)));
    }

    #[test]
    fn test_subscribe_notifies_on_change_only() {
        let value = MotionValue::new(0.0);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let id = value.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        value.set(1.0);
        value.set(1.0);
        value.set(2.0);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(value.unsubscribe(id));
        assert!(!value.unsubscribe(id));
        value.set(3.0);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_listener_can_read_store() {
        let value = MotionValue::new(0.0);
        let handle = value.clone();
        let observed = Arc::new(Mutex::new(None));
        let sink = observed.clone();
        value.subscribe(move |_| {
            *sink.lock() = handle.get_f64();
        });
        value.set(4.0);
        assert_eq!(*observed.lock(), Some(4.0));
        assert_eq!(value.listener_count(), 1);
    }
}
