//! # Delegation Status
//!
//! Background lookup of whether the account can batch approval and swap
//! into one transaction on the active chain. Each lookup is keyed by its
//! (chain, address) identity: starting a lookup for a new identity aborts
//! the in-flight one, and a superseded or cancelled lookup never lands its
//! result.

use parking_lot::Mutex;
use shared::ChainId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::service::DelegationService;
use crate::runtime::{EngineContext, HandoffCell};

/// Identity of one status lookup.
type CheckKey = (ChainId, String);

/// Tracks the delegation status of the active (chain, address) pair.
///
/// The status is `None` until a lookup for the current identity lands, so a
/// stale answer from a previous chain never shows for the new one.
pub struct DelegationChecker {
    service: Arc<dyn DelegationService>,
    ctx: EngineContext,
    status: HandoffCell<Option<bool>>,
    inflight: Mutex<Option<(CheckKey, JoinHandle<()>)>>,
    generation: AtomicU64,
}

impl DelegationChecker {
    pub fn new(service: Arc<dyn DelegationService>, ctx: EngineContext) -> Self {
        Self {
            service,
            ctx,
            status: HandoffCell::new(None),
            inflight: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// `Some(true)` once the current identity is known to be delegated,
    /// `None` while unknown or mid-lookup.
    pub fn status(&self) -> Option<bool> {
        self.status.get()
    }

    /// Look up the status for a (chain, address) identity.
    ///
    /// A repeat of the identity already in flight is a no-op. Any other
    /// identity aborts the in-flight lookup, clears the status, and starts
    /// over.
    pub fn check(self: &Arc<Self>, chain_id: ChainId, address: &str) {
        let key: CheckKey = (chain_id, address.to_string());
        let mut inflight = self.inflight.lock();
        if let Some((current, handle)) = inflight.as_ref() {
            if *current == key && !handle.is_finished() {
                return;
            }
        }
        if let Some((_, handle)) = inflight.take() {
            handle.abort();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.status.set(None);

        let checker = self.clone();
        let task_key = key.clone();
        let handle = self.ctx.spawn(async move {
            match checker.service.is_delegated(task_key.0, &task_key.1).await {
                Ok(delegated) => {
                    let landing = checker.clone();
                    checker.ctx.run_on_interactive(move || {
                        // Checked at drain time: a newer check or a cancel
                        // may own the status by the time this job runs
                        if landing.generation.load(Ordering::SeqCst) == generation {
                            landing.status.set(Some(delegated));
                        }
                    });
                }
                Err(err) => {
                    debug!(chain_id = %task_key.0, error = %err, "delegation lookup failed");
                }
            }
        });
        *inflight = Some((key, handle));
    }

    /// Abort any in-flight lookup and forget the status.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some((_, handle)) = self.inflight.lock().take() {
            handle.abort();
        }
        self.status.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Delegated on mainnet, not elsewhere; hangs forever on Optimism.
    struct MockDelegation;

    #[async_trait]
    impl DelegationService for MockDelegation {
        async fn is_delegated(&self, chain_id: ChainId, _address: &str) -> Result<bool> {
            if chain_id == ChainId::OPTIMISM {
                futures::future::pending::<()>().await;
            }
            Ok(chain_id == ChainId::MAINNET)
        }
    }

    fn checker() -> (Arc<DelegationChecker>, EngineContext) {
        let ctx = EngineContext::new();
        (Arc::new(DelegationChecker::new(Arc::new(MockDelegation), ctx.clone())), ctx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_lands_on_the_interactive_side() {
        let (checker, ctx) = checker();
        checker.check(ChainId::MAINNET, "0xabc");

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(checker.status(), None);

        ctx.run_pending();
        assert_eq!(checker.status(), Some(true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_identity_change_aborts_and_supersedes() {
        let (checker, ctx) = checker();

        // This lookup never completes on its own
        checker.check(ChainId::OPTIMISM, "0xabc");
        tokio::time::sleep(Duration::from_millis(1)).await;

        checker.check(ChainId::POLYGON, "0xabc");
        tokio::time::sleep(Duration::from_millis(1)).await;
        ctx.run_pending();

        // Only the newest identity's answer applies
        assert_eq!(checker.status(), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_identity_keeps_the_inflight_lookup() {
        let (checker, _ctx) = checker();
        checker.check(ChainId::OPTIMISM, "0xabc");
        // Re-asking for the same identity must not clear or restart
        checker.check(ChainId::OPTIMISM, "0xabc");
        assert_eq!(checker.status(), None);
        assert!(checker.inflight.lock().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_blocks_a_completed_lookup_from_landing() {
        let (checker, ctx) = checker();
        checker.check(ChainId::MAINNET, "0xabc");
        tokio::time::sleep(Duration::from_millis(1)).await;

        // The lookup finished, but its hand-off has not drained yet
        checker.cancel();
        ctx.run_pending();
        assert_eq!(checker.status(), None);
    }
}
