//! # Interval Scheduler
//!
//! A reusable stop/start polling loop. Both the gas controller and the quote
//! coordinator poll on one of these: `start` while running is a no-op, and
//! `stop` cancels between ticks. Whether the first tick fires immediately
//! and whether installing the tick also starts it are configurable.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Factory producing one poll tick's worth of work.
pub type TickFn = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// How an installed tick fires.
#[derive(Debug, Clone, Copy)]
pub struct IntervalConfig {
    /// Time between ticks.
    pub period: Duration,
    /// Whether installing the tick also starts it.
    pub auto_start: bool,
    /// Whether the first tick fires immediately rather than one period in.
    pub fetch_on_mount: bool,
}

impl IntervalConfig {
    /// The common shape: starts on install, first tick immediate.
    pub fn every(period: Duration) -> Self {
        Self { period, auto_start: true, fetch_on_mount: true }
    }
}

/// A cancellable fixed-interval poller.
pub struct IntervalScheduler {
    name: &'static str,
    installed: Mutex<Option<(IntervalConfig, TickFn)>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl IntervalScheduler {
    pub fn new(name: &'static str) -> Self {
        Self { name, installed: Mutex::new(None), handle: Mutex::new(None) }
    }

    /// Install the tick, replacing any previous one. Starts right away
    /// unless `auto_start` is off.
    pub fn install(&self, config: IntervalConfig, tick: TickFn) {
        *self.installed.lock() = Some((config, tick));
        if config.auto_start {
            self.start();
        }
    }

    /// Start firing the installed tick. A no-op until a tick is installed.
    ///
    /// Idempotent: if the scheduler is already running, the existing cadence
    /// is kept.
    pub fn start(&self) {
        let Some((config, tick)) = self.installed.lock().clone() else {
            debug!(scheduler = self.name, "no tick installed, start ignored");
            return;
        };
        let mut handle = self.handle.lock();
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            debug!(scheduler = self.name, "already running, start ignored");
            return;
        }

        debug!(scheduler = self.name, period_ms = config.period.as_millis() as u64, "starting");
        *handle = Some(tokio::spawn(async move {
            if !config.fetch_on_mount {
                tokio::time::sleep(config.period).await;
            }
            loop {
                tick().await;
                tokio::time::sleep(config.period).await;
            }
        }));
    }

    /// Stop polling. In-flight tick work is cancelled at its next await
    /// point. Idempotent.
    pub fn stop(&self) {
        if let Some(handle) = self.handle.lock().take() {
            debug!(scheduler = self.name, "stopping");
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.lock().as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
