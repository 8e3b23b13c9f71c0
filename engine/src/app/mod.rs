//! # The Assembled Engine
//!
//! [`SwapEngine`] wires the gas controller, the quote coordinator, the
//! navigator, and the swap form together behind one handle the embedder
//! drives: mutate the form from the interactive side, call
//! [`SwapEngine::run_pending`] once per frame, and read the derived state
//! back out.
//!
//! ## Modules
//!
//! - **[`navigation`]**: Per-side focus steps and the config panel
//! - **[`warning`]**: Price impact and the prioritized review warning
//! - **[`funds`]**: Gas funds sufficiency and max swappable amount
//! - **[`delegation`]**: Account delegation status on the active chain
//! - **[`state`]**: The swap form

pub mod delegation;
pub mod funds;
pub mod navigation;
pub mod state;
pub mod warning;

use shared::{Asset, ChainId, EstimatedTime, SwapSide, TotalFee, TxRequest};
use std::sync::Arc;
use tracing::info;

use crate::core::config::EngineConfig;
use crate::core::service::{
    DelegationService, FeeOracle, GasSimulator, L1FeeOracle, QuoteService,
};
use crate::gas::settings::GasSettingsStore;
use crate::gas::GasController;
use crate::quote::{QuoteCoordinator, QuoteStatus};
use crate::runtime::{Debouncer, EngineContext, HandoffCell};
use crate::utils::math;

use delegation::DelegationChecker;
use navigation::Navigator;
use state::SwapForm;
use warning::{ImpactSeverity, PriceImpact, SwapWarning};

/// The swap screen's orchestration engine.
pub struct SwapEngine {
    ctx: EngineContext,
    pub gas: Arc<GasController>,
    pub quotes: Arc<QuoteCoordinator>,
    pub navigator: Arc<Navigator>,
    pub delegation: Arc<DelegationChecker>,
    form: HandoffCell<SwapForm>,
    chain_settle: Debouncer,
}

impl SwapEngine {
    /// Build and wire an engine. The embedder supplies the service
    /// implementations; see [`crate::services`] for the HTTP ones.
    pub fn new(
        oracle: Arc<dyn FeeOracle>,
        quote_service: Arc<dyn QuoteService>,
        simulator: Arc<dyn GasSimulator>,
        l1_oracle: Arc<dyn L1FeeOracle>,
        delegation_service: Arc<dyn DelegationService>,
        config: EngineConfig,
        from_address: &str,
        chain_id: ChainId,
    ) -> Arc<Self> {
        let ctx = EngineContext::new();
        let chain_settle = Debouncer::new(config.chain_settle_debounce());
        let gas = Arc::new(GasController::new(
            oracle,
            simulator,
            l1_oracle,
            Arc::new(GasSettingsStore::new()),
            chain_id,
            config.clone(),
            ctx.clone(),
        ));
        let quotes = Arc::new(QuoteCoordinator::new(quote_service, config, ctx.clone()));
        let navigator = Arc::new(Navigator::new());
        let delegation = Arc::new(DelegationChecker::new(delegation_service, ctx.clone()));
        let form = HandoffCell::new(SwapForm::new(from_address));

        // Every fresh quote re-simulates the gas limit for its transaction
        let gas_for_quotes = gas.clone();
        quotes.state().observe(move |quote_state| {
            if let Some(tx) = quote_state.result.as_ref().and_then(TxRequest::from_quote) {
                gas_for_quotes.set_tx_request(tx);
            }
        });

        let engine =
            Arc::new(Self { ctx, gas, quotes, navigator, delegation, form, chain_settle });

        // Closing the token search refetches with whatever got picked
        let engine_for_search = Arc::downgrade(&engine);
        engine.navigator.on_exit_search(move || {
            if let Some(engine) = engine_for_search.upgrade() {
                engine.resync();
            }
        });

        engine
    }

    /// Drain background results into the interactive state. Call once per
    /// frame.
    pub fn run_pending(&self) -> usize {
        self.ctx.run_pending()
    }

    /// Start background polling and the initial delegation lookup. Quote
    /// polling starts on its own once the form describes a swap.
    pub fn start(&self) {
        info!("starting swap engine");
        self.gas.start_polling();
        self.check_delegation(self.gas.state().with(|s| s.chain_id));
    }

    /// Stop all background work. Safe to call more than once; `start`
    /// brings everything back.
    pub fn teardown(&self) {
        info!("tearing down swap engine");
        self.gas.stop_polling();
        self.quotes.clear();
        self.delegation.cancel();
        self.chain_settle.cancel();
    }

    pub fn form(&self) -> SwapForm {
        self.form.get()
    }

    pub fn set_sell_asset(&self, asset: Asset) {
        let chain_id = asset.chain_id;
        if asset.is_native() {
            self.gas.set_native_asset(asset.native_price.clone(), &asset.symbol);
        }
        self.form.update(|f| f.sell_asset = Some(asset));
        self.gas.set_chain(chain_id);
        self.check_delegation(chain_id);
        self.resync();
    }

    /// Set the output asset. A switch to a different output chain settles
    /// briefly before committing, so the chain picker can finish animating
    /// without a refetch per frame.
    pub fn set_buy_asset(self: &Arc<Self>, asset: Asset) {
        let previous_chain = self.form.with(|f| f.buy_asset.as_ref().map(|a| a.chain_id));
        let chain_changed = previous_chain.is_some_and(|c| c != asset.chain_id);
        self.form.update(|f| f.buy_asset = Some(asset));

        if chain_changed {
            let engine = Arc::downgrade(self);
            self.chain_settle.call(Box::pin(async move {
                if let Some(engine) = engine.upgrade() {
                    let ctx = engine.ctx.clone();
                    ctx.run_on_interactive(move || engine.resync());
                }
            }));
        } else {
            self.resync();
        }
    }

    /// Swap the two sides, keeping the entered amount on its side.
    pub fn flip_assets(&self) {
        self.form.update(|f| std::mem::swap(&mut f.sell_asset, &mut f.buy_asset));
        if let Some(chain_id) = self.form.with(|f| f.sell_asset.as_ref().map(|a| a.chain_id)) {
            self.gas.set_chain(chain_id);
            self.check_delegation(chain_id);
        }
        self.resync();
    }

    pub fn set_amount(&self, amount: &str) {
        let amount = amount.to_string();
        self.form.update(|f| f.amount = amount);
        self.resync();
    }

    pub fn set_side(&self, side: SwapSide) {
        self.form.update(|f| f.side = side);
        self.resync();
    }

    pub fn set_slippage_bps(&self, slippage_bps: u16) {
        self.form.update(|f| f.slippage_bps = slippage_bps);
        self.resync();
    }

    /// Native balance on the sell chain, decimal units.
    pub fn set_native_balance(&self, balance: &str) {
        let balance = balance.to_string();
        self.form.update(|f| f.native_balance = balance);
    }

    /// Mark the amount slider as scrubbing; impact warnings pause until the
    /// scrub ends.
    pub fn set_scrubbing(&self, scrubbing: bool) {
        self.form.update(|f| f.scrubbing = scrubbing);
    }

    /// Reconcile the quote coordinator with the current form.
    fn resync(&self) {
        match self.form.with(|f| f.to_input()) {
            Some(input) => self.quotes.set_input(input),
            None => self.quotes.clear(),
        }
    }

    fn check_delegation(&self, chain_id: ChainId) {
        let address = self.form.with(|f| f.from_address.clone());
        self.delegation.check(chain_id, &address);
    }

    /// Whether the account can batch approval and swap on the sell chain.
    /// `None` while unknown or mid-lookup.
    pub fn is_delegated(&self) -> Option<bool> {
        self.delegation.status()
    }

    /// Total network fee at the effective speed, once gas data is in.
    pub fn selected_fee(&self) -> Option<TotalFee> {
        self.gas.state().with(|s| {
            let by_speed = s.by_speed.as_ref()?;
            let speed = self.gas.settings.effective_speed(s.chain_id);
            Some(by_speed.get(speed).gas_fee().clone())
        })
    }

    /// Confirmation estimate at the effective speed.
    pub fn estimated_confirmation_time(&self) -> Option<EstimatedTime> {
        self.gas.state().with(|s| {
            let by_speed = s.by_speed.as_ref()?;
            let speed = self.gas.settings.effective_speed(s.chain_id);
            Some(by_speed.get(speed).estimated_time().clone())
        })
    }

    /// The one warning the review screen shows right now.
    pub fn warning(&self) -> SwapWarning {
        let (scrubbing, sell_asset, buy_asset) =
            self.form.with(|f| (f.scrubbing, f.sell_asset.clone(), f.buy_asset.clone()));

        self.quotes.state().with(|quote_state| {
            let impact = match (quote_state.quote(), sell_asset.as_ref(), buy_asset.as_ref()) {
                (Some(quote), Some(sell), Some(buy)) => {
                    // A math failure here means an unpriceable trade
                    Some(
                        warning::classify_price_impact(quote, sell, buy)
                            .unwrap_or(PriceImpact::Unknown),
                    )
                }
                _ => None,
            };
            warning::derive_warning(
                quote_state.result.as_ref(),
                impact.as_ref(),
                quote_state.service_time_secs(),
                scrubbing,
            )
        })
    }

    /// Severity of the value lost in the current trade, for tinting the
    /// amount fields. Unlike [`SwapEngine::warning`], a trade that cannot
    /// be valued reads as no severity at all, and an in-flight fetch or an
    /// active scrub clears it.
    pub fn price_impact_severity(&self) -> ImpactSeverity {
        let (scrubbing, sell_asset, buy_asset) =
            self.form.with(|f| (f.scrubbing, f.sell_asset.clone(), f.buy_asset.clone()));

        self.quotes.state().with(|quote_state| {
            let is_fetching = quote_state.status == QuoteStatus::Fetching;
            let (input_value, output_value) =
                match (quote_state.quote(), sell_asset.as_ref(), buy_asset.as_ref()) {
                    (Some(quote), Some(sell), Some(buy)) => (
                        native_value(&quote.sell_amount, sell),
                        native_value(&quote.buy_amount_display, buy),
                    ),
                    _ => (None, None),
                };
            warning::impact_severity(
                input_value.as_deref(),
                output_value.as_deref(),
                is_fetching,
                scrubbing,
            )
            .unwrap_or(ImpactSeverity::None)
        })
    }

    /// Whether the native balance covers the estimated fee with headroom.
    /// `None` until a fee estimate exists.
    pub fn has_enough_for_gas(&self) -> Option<bool> {
        let fee = self.selected_fee()?;
        let balance_wei = self.native_balance_wei()?;
        funds::has_enough_for_gas(&balance_wei, &fee.amount).ok()
    }

    /// Largest native amount that can go into the swap, decimal units.
    /// `None` until a fee estimate exists.
    pub fn max_swappable_native(&self) -> Option<String> {
        let fee = self.selected_fee()?;
        let balance_wei = self.native_balance_wei()?;
        let chain_id = self.gas.state().with(|s| s.chain_id);
        let max_wei = funds::max_swappable_native_wei(&balance_wei, &fee.amount).ok()?;
        math::convert_raw_to_decimal(&max_wei, chain_id.native_asset_decimals()).ok()
    }

    fn native_balance_wei(&self) -> Option<String> {
        let balance = self.form.with(|f| f.native_balance.clone());
        let decimals = self.gas.state().with(|s| s.chain_id.native_asset_decimals());
        math::convert_decimal_to_raw(&balance, decimals).ok()
    }
}

/// Native value of a raw token amount, when the asset carries a price.
fn native_value(raw: &str, asset: &Asset) -> Option<String> {
    let price = asset.native_price.as_deref()?;
    math::raw_amount_to_display_value(raw, asset.decimals, price).ok()
}
