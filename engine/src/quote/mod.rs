//! # Quote Orchestration
//!
//! The quote coordinator keeps a fresh quote for the current swap input. A
//! change of input clears the displayed quote immediately (a stale quote for
//! the wrong pair is worse than none), bumps a generation counter so late
//! responses for the old input are dropped, and refetches on a fixed
//! cadence until stopped.
//!
//! Wraps and unwraps of the native asset are detected here and tagged on
//! the quote so downstream layers can skip slippage and impact warnings
//! for what is a 1:1 conversion.

use shared::{Asset, ChainId, Quote, QuoteResult, SwapSide, SwapType};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::core::config::EngineConfig;
use crate::core::service::{QuoteRequest, QuoteService};
use crate::runtime::{EngineContext, HandoffCell, IntervalConfig, IntervalScheduler};
use crate::utils::math;

/// The user's swap input, as the interactive side describes it.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapInput {
    pub sell_asset: Asset,
    pub buy_asset: Asset,
    /// Amount in decimal token units, on the side given by `side`.
    pub amount: String,
    pub side: SwapSide,
    pub from_address: String,
    pub slippage_bps: u16,
}

impl SwapInput {
    pub fn chain_id(&self) -> ChainId {
        self.sell_asset.chain_id
    }

    pub fn is_crosschain(&self) -> bool {
        self.sell_asset.chain_id != self.buy_asset.chain_id
    }

    /// Wrap/unwrap detection: native against its own chain's wrapped form.
    pub fn wrap_type(&self) -> Option<SwapType> {
        if self.is_crosschain() {
            return None;
        }
        if self.sell_asset.is_native() && self.buy_asset.is_wrapped_native() {
            Some(SwapType::Wrap)
        } else if self.sell_asset.is_wrapped_native() && self.buy_asset.is_native() {
            Some(SwapType::Unwrap)
        } else {
            None
        }
    }
}

/// Quote fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStatus {
    /// No input yet, or the input was cleared.
    Idle,
    /// A fetch for the current input is in flight and nothing is displayed.
    Fetching,
    /// A quote (or a structured aggregator error) is displayed.
    Ready,
    /// The fetch itself failed; there is nothing to display.
    Failed,
}

/// Everything the interactive side reads about quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteState {
    pub status: QuoteStatus,
    pub input: Option<SwapInput>,
    pub result: Option<QuoteResult>,
    pub last_error: Option<String>,
}

impl QuoteState {
    fn idle() -> Self {
        Self { status: QuoteStatus::Idle, input: None, result: None, last_error: None }
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.result.as_ref().and_then(|r| r.as_quote())
    }

    /// Cross-chain service time, for the long-wait warning.
    pub fn service_time_secs(&self) -> Option<u64> {
        self.quote().and_then(|q| q.service_time_secs)
    }
}

/// Keeps the displayed quote in sync with the swap input.
pub struct QuoteCoordinator {
    service: Arc<dyn QuoteService>,
    state: HandoffCell<QuoteState>,
    ctx: EngineContext,
    config: EngineConfig,
    scheduler: IntervalScheduler,
    /// Bumped on every input change; stale responses compare and drop.
    generation: AtomicU64,
}

impl QuoteCoordinator {
    pub fn new(service: Arc<dyn QuoteService>, config: EngineConfig, ctx: EngineContext) -> Self {
        Self {
            service,
            state: HandoffCell::new(QuoteState::idle()),
            ctx,
            config,
            scheduler: IntervalScheduler::new("quote"),
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> &HandoffCell<QuoteState> {
        &self.state
    }

    /// Set the swap input. The displayed quote clears immediately and a
    /// fresh fetch starts, repeating on the configured cadence.
    pub fn set_input(self: &Arc<Self>, input: SwapInput) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.set(QuoteState {
            status: QuoteStatus::Fetching,
            input: Some(input),
            result: None,
            last_error: None,
        });

        // Restart the poll so the new input gets an immediate first fetch
        self.scheduler.stop();
        let coordinator = self.clone();
        self.scheduler.install(
            IntervalConfig::every(self.config.quote_poll_interval()),
            Arc::new(move || {
                let coordinator = coordinator.clone();
                Box::pin(async move {
                    coordinator.fetch(generation).await;
                })
            }),
        );
    }

    /// Clear the input and stop fetching.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.scheduler.stop();
        self.state.set(QuoteState::idle());
    }

    pub fn stop_polling(&self) {
        self.scheduler.stop();
    }

    pub fn is_polling(&self) -> bool {
        self.scheduler.is_running()
    }

    async fn fetch(self: &Arc<Self>, generation: u64) {
        let Some(input) = self.state.with(|s| s.input.clone()) else {
            return;
        };
        let request = match build_request(&input) {
            Ok(request) => request,
            Err(err) => {
                self.publish_failure(generation, err.to_string());
                return;
            }
        };

        let outcome = if request.is_crosschain() {
            self.service.fetch_crosschain_quote(&request).await
        } else {
            self.service.fetch_quote(&request).await
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("dropping stale quote response");
            return;
        }

        match outcome {
            Ok(mut result) => {
                if let (Some(wrap_type), QuoteResult::Ok(quote)) = (input.wrap_type(), &mut result)
                {
                    // A wrap is 1:1 and carries no protocol fee
                    quote.swap_type = wrap_type;
                    quote.sell_amount_display = quote.sell_amount.clone();
                    quote.buy_amount_display = quote.buy_amount.clone();
                    quote.fee = "0".to_string();
                }
                self.publish_ready(generation, result);
            }
            Err(err) => {
                debug!(error = %err, "quote fetch failed");
                self.publish_failure(generation, err.to_string());
            }
        }
    }

    fn publish_ready(&self, generation: u64, result: QuoteResult) {
        if self.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        let state = self.state.clone();
        self.ctx.run_on_interactive(move || {
            state.update(|s| {
                s.status = QuoteStatus::Ready;
                s.result = Some(result);
                s.last_error = None;
            });
        });
    }

    /// Transport failure: keep whatever quote was last displayed and record
    /// the error alongside it.
    fn publish_failure(&self, generation: u64, error: String) {
        if self.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        let state = self.state.clone();
        self.ctx.run_on_interactive(move || {
            state.update(|s| {
                s.status = QuoteStatus::Failed;
                s.last_error = Some(error);
            });
        });
    }
}

/// Convert the decimal-amount swap input into an aggregator request with
/// raw integer amounts on the correct side.
fn build_request(input: &SwapInput) -> crate::core::error::Result<QuoteRequest> {
    let (sell_amount, buy_amount) = match input.side {
        SwapSide::Input => {
            let raw = math::convert_decimal_to_raw(&input.amount, input.sell_asset.decimals)?;
            (Some(raw), None)
        }
        SwapSide::Output => {
            let raw = math::convert_decimal_to_raw(&input.amount, input.buy_asset.decimals)?;
            (None, Some(raw))
        }
    };

    Ok(QuoteRequest {
        chain_id: input.sell_asset.chain_id,
        to_chain_id: input.buy_asset.chain_id,
        sell_token: input.sell_asset.address.clone(),
        buy_token: input.buy_asset.address.clone(),
        sell_amount,
        buy_amount,
        side: input.side,
        from_address: input.from_address.clone(),
        slippage_bps: input.slippage_bps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::QuoteError;
    use std::sync::atomic::AtomicUsize;

    fn asset(chain_id: ChainId, address: &str, decimals: u32) -> Asset {
        Asset {
            address: address.to_string(),
            chain_id,
            decimals,
            symbol: "TOK".to_string(),
            native_price: None,
            balance: "0".to_string(),
        }
    }

    fn native(chain_id: ChainId) -> Asset {
        asset(chain_id, chain_id.native_asset_address(), 18)
    }

    fn wrapped(chain_id: ChainId) -> Asset {
        asset(chain_id, chain_id.wrapped_native_address().unwrap(), 18)
    }

    fn input(sell: Asset, buy: Asset) -> SwapInput {
        SwapInput {
            sell_asset: sell,
            buy_asset: buy,
            amount: "1.5".to_string(),
            side: SwapSide::Input,
            from_address: "0x2222222222222222222222222222222222222222".to_string(),
            slippage_bps: 100,
        }
    }

    fn quote_for(chain_id: ChainId) -> QuoteResult {
        QuoteResult::Ok(Box::new(Quote {
            sell_amount: "1500000000000000000".to_string(),
            buy_amount: "4792500000".to_string(),
            sell_amount_display: "1500000000000000000".to_string(),
            buy_amount_display: "4792500000".to_string(),
            to: "0x1111111111111111111111111111111111111111".to_string(),
            from: "0x2222222222222222222222222222222222222222".to_string(),
            value: "0".to_string(),
            data: "0xabcdef".to_string(),
            swap_type: SwapType::Normal,
            chain_id,
            fee: "0".to_string(),
            service_time_secs: None,
        }))
    }

    struct MockQuoteService {
        result: QuoteResult,
        same_chain_calls: AtomicUsize,
        crosschain_calls: AtomicUsize,
    }

    impl MockQuoteService {
        fn new(result: QuoteResult) -> Self {
            Self {
                result,
                same_chain_calls: AtomicUsize::new(0),
                crosschain_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl QuoteService for MockQuoteService {
        async fn fetch_quote(
            &self,
            _request: &QuoteRequest,
        ) -> crate::core::error::Result<QuoteResult> {
            self.same_chain_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.clone())
        }

        async fn fetch_crosschain_quote(
            &self,
            _request: &QuoteRequest,
        ) -> crate::core::error::Result<QuoteResult> {
            self.crosschain_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.clone())
        }
    }

    fn coordinator(
        ctx: &EngineContext,
        result: QuoteResult,
    ) -> (Arc<QuoteCoordinator>, Arc<MockQuoteService>) {
        let service = Arc::new(MockQuoteService::new(result));
        let coordinator = Arc::new(QuoteCoordinator::new(
            service.clone(),
            EngineConfig::default(),
            ctx.clone(),
        ));
        (coordinator, service)
    }

    #[test]
    fn test_wrap_type_detection() {
        let wrap = input(native(ChainId::MAINNET), wrapped(ChainId::MAINNET));
        assert_eq!(wrap.wrap_type(), Some(SwapType::Wrap));

        let unwrap = input(wrapped(ChainId::MAINNET), native(ChainId::MAINNET));
        assert_eq!(unwrap.wrap_type(), Some(SwapType::Unwrap));

        let normal = input(native(ChainId::MAINNET), asset(ChainId::MAINNET, "0xa0b8", 6));
        assert_eq!(normal.wrap_type(), None);

        // Native to wrapped across chains is a bridge, not a wrap
        let bridged = input(native(ChainId::MAINNET), wrapped(ChainId::OPTIMISM));
        assert_eq!(bridged.wrap_type(), None);
    }

    #[test]
    fn test_build_request_sides() {
        let mut swap = input(native(ChainId::MAINNET), asset(ChainId::MAINNET, "0xa0b8", 6));
        let request = build_request(&swap).unwrap();
        assert_eq!(request.sell_amount.as_deref(), Some("1500000000000000000"));
        assert_eq!(request.buy_amount, None);

        swap.side = SwapSide::Output;
        let request = build_request(&swap).unwrap();
        assert_eq!(request.sell_amount, None);
        assert_eq!(request.buy_amount.as_deref(), Some("1500000"));
    }

    #[tokio::test]
    async fn test_fetch_publishes_after_drain() {
        let ctx = EngineContext::new();
        let (coordinator, _) =
            coordinator(&ctx, quote_for(ChainId::MAINNET));
        coordinator.state().set(QuoteState {
            status: QuoteStatus::Fetching,
            input: Some(input(native(ChainId::MAINNET), asset(ChainId::MAINNET, "0xa0b8", 6))),
            result: None,
            last_error: None,
        });

        let generation = coordinator.generation.load(Ordering::SeqCst);
        coordinator.fetch(generation).await;
        ctx.run_pending();

        let state = coordinator.state().get();
        assert_eq!(state.status, QuoteStatus::Ready);
        assert!(state.quote().is_some());
    }

    #[tokio::test]
    async fn test_stale_generation_dropped() {
        let ctx = EngineContext::new();
        let (coordinator, _) = coordinator(&ctx, quote_for(ChainId::MAINNET));
        coordinator.state().set(QuoteState {
            status: QuoteStatus::Fetching,
            input: Some(input(native(ChainId::MAINNET), asset(ChainId::MAINNET, "0xa0b8", 6))),
            result: None,
            last_error: None,
        });

        // The input changed while this fetch was in flight
        let stale = coordinator.generation.fetch_add(1, Ordering::SeqCst);
        coordinator.fetch(stale).await;
        ctx.run_pending();

        assert_eq!(coordinator.state().get().status, QuoteStatus::Fetching);
        assert!(coordinator.state().get().result.is_none());
    }

    #[tokio::test]
    async fn test_crosschain_dispatch() {
        let ctx = EngineContext::new();
        let (coordinator, service) = coordinator(&ctx, quote_for(ChainId::MAINNET));
        coordinator.state().set(QuoteState {
            status: QuoteStatus::Fetching,
            input: Some(input(native(ChainId::MAINNET), asset(ChainId::OPTIMISM, "0xa0b8", 6))),
            result: None,
            last_error: None,
        });

        coordinator.fetch(coordinator.generation.load(Ordering::SeqCst)).await;
        assert_eq!(service.crosschain_calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.same_chain_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_wrap_forced_on_result() {
        let ctx = EngineContext::new();
        let (coordinator, _) = coordinator(&ctx, quote_for(ChainId::MAINNET));
        coordinator.state().set(QuoteState {
            status: QuoteStatus::Fetching,
            input: Some(input(native(ChainId::MAINNET), wrapped(ChainId::MAINNET))),
            result: None,
            last_error: None,
        });

        coordinator.fetch(coordinator.generation.load(Ordering::SeqCst)).await;
        ctx.run_pending();

        let state = coordinator.state().get();
        let quote = state.quote().unwrap();
        assert_eq!(quote.swap_type, SwapType::Wrap);
        assert_eq!(quote.sell_amount_display, quote.sell_amount);
        assert_eq!(quote.buy_amount_display, quote.buy_amount);
        assert_eq!(quote.fee, "0");
    }

    struct FailingQuoteService;

    #[async_trait]
    impl QuoteService for FailingQuoteService {
        async fn fetch_quote(
            &self,
            _request: &QuoteRequest,
        ) -> crate::core::error::Result<QuoteResult> {
            Err(crate::EngineError::Oracle("connection reset".to_string()))
        }

        async fn fetch_crosschain_quote(
            &self,
            _request: &QuoteRequest,
        ) -> crate::core::error::Result<QuoteResult> {
            Err(crate::EngineError::Oracle("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_previous_quote() {
        let ctx = EngineContext::new();
        let coordinator = Arc::new(QuoteCoordinator::new(
            Arc::new(FailingQuoteService),
            EngineConfig::default(),
            ctx.clone(),
        ));
        coordinator.state().set(QuoteState {
            status: QuoteStatus::Ready,
            input: Some(input(native(ChainId::MAINNET), asset(ChainId::MAINNET, "0xa0b8", 6))),
            result: Some(quote_for(ChainId::MAINNET)),
            last_error: None,
        });

        coordinator.fetch(coordinator.generation.load(Ordering::SeqCst)).await;
        ctx.run_pending();

        let state = coordinator.state().get();
        assert_eq!(state.status, QuoteStatus::Failed);
        assert!(state.last_error.is_some());
        // The stale-but-valid quote stays on screen
        assert!(state.quote().is_some());
    }

    #[tokio::test]
    async fn test_aggregator_error_is_ready_not_failed() {
        let ctx = EngineContext::new();
        let error = QuoteResult::Err(QuoteError {
            error: true,
            error_code: 502,
            message: "no routes found".to_string(),
        });
        let (coordinator, _) = coordinator(&ctx, error);
        coordinator.state().set(QuoteState {
            status: QuoteStatus::Fetching,
            input: Some(input(native(ChainId::MAINNET), asset(ChainId::MAINNET, "0xa0b8", 6))),
            result: None,
            last_error: None,
        });

        coordinator.fetch(coordinator.generation.load(Ordering::SeqCst)).await;
        ctx.run_pending();

        let state = coordinator.state().get();
        assert_eq!(state.status, QuoteStatus::Ready);
        assert!(state.result.as_ref().unwrap().is_error());
        assert!(state.quote().is_none());
    }

    #[tokio::test]
    async fn test_clear_stops_polling_and_resets() {
        let ctx = EngineContext::new();
        let (coordinator, _) = coordinator(&ctx, quote_for(ChainId::MAINNET));
        coordinator.set_input(input(native(ChainId::MAINNET), asset(ChainId::MAINNET, "0xa0b8", 6)));
        assert!(coordinator.is_polling());

        coordinator.clear();
        assert!(!coordinator.is_polling());
        assert_eq!(coordinator.state().get().status, QuoteStatus::Idle);
        assert!(coordinator.state().get().input.is_none());
    }
}
