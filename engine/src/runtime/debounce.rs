//! # Trailing-Edge Debouncer
//!
//! Collapses a burst of calls into one: only the last call within the
//! window runs, after the window elapses. Custom fee edits and gas-limit
//! re-simulation both sit behind one of these so keystrokes and slider
//! scrubs do not fan out into a request per change.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A trailing-edge debouncer. Each `call` cancels the previous pending one.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: Mutex::new(None) }
    }

    /// Schedule `work` to run after the delay, cancelling any previously
    /// scheduled work that has not started yet.
    pub fn call(&self, work: BoxFuture<'static, ()>) {
        let delay = self.delay;
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            work.await;
        }));
    }

    /// Drop any pending work without running it.
    pub fn cancel(&self) {
        if let Some(pending) = self.pending.lock().take() {
            pending.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
