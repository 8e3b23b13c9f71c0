//! # Hand-Off Value Cell
//!
//! An observable value cell shared between the background and interactive
//! contexts. Reads are cheap clones; writes from background tasks ride the
//! [`EngineContext`] job queue, so the interactive side only ever observes a
//! value change inside `run_pending()` and observers run on the interactive
//! side.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::runtime::context::EngineContext;

type Observer<T> = Box<dyn Fn(&T) + Send + Sync + 'static>;

struct CellInner<T> {
    value: RwLock<T>,
    observers: RwLock<Vec<Observer<T>>>,
}

/// An observable value cell with a single hand-off point for background
/// writes.
pub struct HandoffCell<T> {
    inner: Arc<CellInner<T>>,
}

impl<T> Clone for HandoffCell<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: Clone + Send + Sync + 'static> HandoffCell<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(CellInner {
                value: RwLock::new(initial),
                observers: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Read the value through a borrow, avoiding a clone.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.read())
    }

    /// Set the value from the interactive side and notify observers
    /// immediately.
    pub fn set(&self, value: T) {
        *self.inner.value.write() = value;
        self.notify();
    }

    /// Mutate the value in place from the interactive side.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.value.write());
        self.notify();
    }

    /// Hand a value off from a background task.
    ///
    /// The write and the observer notifications happen inside the next
    /// `run_pending()` on the interactive side, never on the calling task.
    pub fn publish(&self, ctx: &EngineContext, value: T) {
        let cell = self.clone();
        ctx.run_on_interactive(move || cell.set(value));
    }

    /// Register an observer called after every value change.
    pub fn observe(&self, observer: impl Fn(&T) + Send + Sync + 'static) {
        self.inner.observers.write().push(Box::new(observer));
    }

    fn notify(&self) {
        let value = self.inner.value.read();
        for observer in self.inner.observers.read().iter() {
            observer(&value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_set_notifies_observers() {
        let cell = HandoffCell::new(0u64);
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_by_observer = seen.clone();
        cell.observe(move |v| {
            seen_by_observer.store(*v as usize, Ordering::SeqCst);
        });

        cell.set(7);
        assert_eq!(cell.get(), 7);
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_publish_defers_until_drain() {
        let ctx = EngineContext::new();
        let cell = HandoffCell::new("stale".to_string());

        cell.publish(&ctx, "fresh".to_string());
        assert_eq!(cell.get(), "stale");

        ctx.run_pending();
        assert_eq!(cell.get(), "fresh");
    }

    #[test]
    fn test_update_in_place() {
        let cell = HandoffCell::new(vec![1, 2]);
        cell.update(|v| v.push(3));
        assert_eq!(cell.get(), vec![1, 2, 3]);
    }
}
