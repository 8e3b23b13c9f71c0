//! # Engine Context
//!
//! The hand-off channel between background tasks and the interactive
//! context. Background tasks enqueue jobs; the embedder calls
//! [`EngineContext::run_pending`] once per frame (or on its own cadence) to
//! apply them on the interactive side.
//!
//! ```rust
//! use swap_engine::runtime::EngineContext;
//!
//! let ctx = EngineContext::new();
//! ctx.run_on_interactive(|| println!("applied on the interactive side"));
//! assert_eq!(ctx.run_pending(), 1);
//! ```

use async_channel::{Receiver, Sender};
use std::future::Future;
use tokio::task::JoinHandle;
use tracing::warn;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// The bridge between background tasks and the interactive context.
///
/// Cheap to clone; all clones share one job queue.
#[derive(Clone)]
pub struct EngineContext {
    jobs_tx: Sender<Job>,
    jobs_rx: Receiver<Job>,
}

impl EngineContext {
    pub fn new() -> Self {
        let (jobs_tx, jobs_rx) = async_channel::unbounded();
        Self { jobs_tx, jobs_rx }
    }

    /// Enqueue a job to run on the interactive side at the next
    /// [`run_pending`](Self::run_pending) call.
    pub fn run_on_interactive(&self, job: impl FnOnce() + Send + 'static) {
        // The channel is unbounded and the receiver lives as long as the
        // context, so the only send failure is engine teardown
        if self.jobs_tx.try_send(Box::new(job)).is_err() {
            warn!("interactive job dropped: engine context closed");
        }
    }

    /// Drain and run all queued jobs. Returns how many ran.
    ///
    /// Call this from the interactive side only; the jobs assume it.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.jobs_rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Spawn a background task on the ambient Tokio runtime.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        tokio::spawn(future)
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
