//! # Gas Orchestration
//!
//! The gas controller keeps fee estimates for the active chain fresh. It
//! polls the fee oracle on a fixed cadence, parses per-speed parameter sets,
//! re-prices the user's custom fees against every new oracle snapshot, and
//! re-simulates the gas limit when the pending transaction changes.
//!
//! All results land in a [`HandoffCell`] and reach the interactive side via
//! `run_pending()`.
//!
//! ## Modules
//!
//! - **[`parse`]**: Oracle payload to [`GasFeeParamsBySpeed`] parsing
//! - **[`limits`]**: Chain-tagged gas-limit tracking
//! - **[`settings`]**: Speed selection and per-chain custom fee storage

pub mod limits;
pub mod parse;
pub mod settings;

use shared::{ChainId, FeeOracleData, GasFeeParamsBySpeed, GasSettings, GasSpeed, TxRequest};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::service::{FeeOracle, GasSimulator, L1FeeOracle};
use crate::runtime::{Debouncer, EngineContext, HandoffCell, IntervalConfig, IntervalScheduler};

use limits::GasLimitStore;
use parse::ParseContext;
use settings::{CustomGasEntry, GasSettingsStore};

/// Everything the interactive side reads about gas, published as one value.
#[derive(Debug, Clone, PartialEq)]
pub struct GasState {
    pub chain_id: ChainId,
    /// Last oracle snapshot, kept for re-pricing custom fees.
    pub fee_data: Option<FeeOracleData>,
    pub by_speed: Option<GasFeeParamsBySpeed>,
    /// OP-stack L1 surcharge for the pending transaction, wei.
    pub l1_security_fee: Option<String>,
    /// Display-currency price of the native asset, when known.
    pub native_price: Option<String>,
    pub native_symbol: String,
    pub flashbots: bool,
    pub last_error: Option<String>,
}

impl GasState {
    fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            fee_data: None,
            by_speed: None,
            l1_security_fee: None,
            native_price: None,
            native_symbol: "ETH".to_string(),
            flashbots: false,
            last_error: None,
        }
    }
}

/// Polls the fee oracle and maintains [`GasState`] for the active chain.
pub struct GasController {
    oracle: Arc<dyn FeeOracle>,
    simulator: Arc<dyn GasSimulator>,
    l1_oracle: Arc<dyn L1FeeOracle>,
    pub settings: Arc<GasSettingsStore>,
    pub limits: Arc<GasLimitStore>,
    state: HandoffCell<GasState>,
    ctx: EngineContext,
    config: EngineConfig,
    scheduler: IntervalScheduler,
    custom_fee_debounce: Debouncer,
    gas_limit_debounce: Debouncer,
}

impl GasController {
    pub fn new(
        oracle: Arc<dyn FeeOracle>,
        simulator: Arc<dyn GasSimulator>,
        l1_oracle: Arc<dyn L1FeeOracle>,
        settings: Arc<GasSettingsStore>,
        chain_id: ChainId,
        config: EngineConfig,
        ctx: EngineContext,
    ) -> Self {
        Self {
            oracle,
            simulator,
            l1_oracle,
            settings,
            limits: Arc::new(GasLimitStore::new(chain_id)),
            state: HandoffCell::new(GasState::new(chain_id)),
            ctx,
            custom_fee_debounce: Debouncer::new(config.custom_fee_debounce()),
            gas_limit_debounce: Debouncer::new(config.gas_limit_debounce()),
            config,
            scheduler: IntervalScheduler::new("gas"),
        }
    }

    pub fn state(&self) -> &HandoffCell<GasState> {
        &self.state
    }

    /// Start polling the oracle. The first fetch fires immediately.
    pub fn start_polling(self: &Arc<Self>) {
        let controller = self.clone();
        self.scheduler.install(
            IntervalConfig::every(self.config.gas_poll_interval()),
            Arc::new(move || {
                let controller = controller.clone();
                Box::pin(async move {
                    controller.refresh().await;
                })
            }),
        );
    }

    pub fn stop_polling(&self) {
        self.scheduler.stop();
        self.custom_fee_debounce.cancel();
        self.gas_limit_debounce.cancel();
    }

    pub fn is_polling(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Switch the active chain. Fee data from the previous chain is dropped
    /// immediately rather than shown against the wrong chain.
    pub fn set_chain(self: &Arc<Self>, chain_id: ChainId) {
        if self.state.with(|s| s.chain_id) == chain_id {
            return;
        }
        self.limits.set_chain(chain_id);
        self.state.update(|s| {
            s.chain_id = chain_id;
            s.fee_data = None;
            s.by_speed = None;
            s.l1_security_fee = None;
        });
        let controller = self.clone();
        self.ctx.spawn(async move {
            controller.refresh().await;
        });
    }

    /// Set the native asset's display price and symbol for fee rendering.
    pub fn set_native_asset(&self, price: Option<String>, symbol: &str) {
        let symbol = symbol.to_string();
        self.state.update(|s| {
            s.native_price = price;
            s.native_symbol = symbol;
        });
    }

    pub fn set_flashbots(&self, flashbots: bool) {
        self.state.update(|s| s.flashbots = flashbots);
    }

    pub fn set_selected_speed(&self, speed: GasSpeed) {
        let chain_id = self.state.with(|s| s.chain_id);
        self.settings.set_selected_speed(chain_id, speed);
    }

    /// Record custom fee edits, debounced so a typing burst re-prices once.
    pub fn set_custom_fees(self: &Arc<Self>, max_base_fee_gwei: &str, max_priority_fee_gwei: &str) {
        let chain_id = self.state.with(|s| s.chain_id);
        self.settings.set_custom(
            chain_id,
            CustomGasEntry {
                max_base_fee_gwei: max_base_fee_gwei.to_string(),
                max_priority_fee_gwei: max_priority_fee_gwei.to_string(),
            },
        );

        let controller = self.clone();
        self.custom_fee_debounce.call(Box::pin(async move {
            controller.republish().await;
        }));
    }

    /// Drop the custom fees for the active chain.
    pub fn clear_custom_fees(self: &Arc<Self>) {
        let chain_id = self.state.with(|s| s.chain_id);
        self.settings.clear_custom(chain_id);
        let controller = self.clone();
        self.ctx.spawn(async move {
            controller.republish().await;
        });
    }

    /// Re-simulate the gas limit for a new pending transaction, debounced
    /// so quote churn does not fan out into a simulation per keystroke.
    pub fn set_tx_request(self: &Arc<Self>, tx: TxRequest) {
        let controller = self.clone();
        self.gas_limit_debounce.call(Box::pin(async move {
            controller.simulate_gas_limit(tx).await;
        }));
    }

    /// The settings used to price the next transaction, `None` until the
    /// first oracle snapshot lands.
    pub fn selected_gas_settings(&self) -> Option<GasSettings> {
        self.state.with(|s| {
            let by_speed = s.by_speed.as_ref()?;
            Some(self.settings.gas_settings(s.chain_id, by_speed))
        })
    }

    /// One oracle poll: fetch, parse every speed, and publish.
    pub async fn refresh(self: &Arc<Self>) {
        let chain_id = self.state.with(|s| s.chain_id);
        match self.oracle.fee_data(chain_id).await {
            Ok(data) => {
                let mut next = self.state.get();
                // The fetch may have raced a chain switch
                if next.chain_id != chain_id {
                    return;
                }
                next.fee_data = Some(data);
                next.last_error = None;
                if let Err(err) = self.reparse(&mut next) {
                    warn!(%chain_id, error = %err, "failed to parse oracle data");
                    next.last_error = Some(err.to_string());
                }
                self.publish_if_changed(next);
            }
            Err(err) => {
                debug!(%chain_id, error = %err, "oracle fetch failed");
                self.state.publish(&self.ctx, {
                    let mut next = self.state.get();
                    next.last_error = Some(err.to_string());
                    next
                });
            }
        }
    }

    /// Re-derive `by_speed` from the cached oracle snapshot, without a new
    /// fetch. Used after custom fee edits and gas-limit updates.
    async fn republish(self: &Arc<Self>) {
        let mut next = self.state.get();
        if next.fee_data.is_none() {
            return;
        }
        if let Err(err) = self.reparse(&mut next) {
            warn!(chain_id = %next.chain_id, error = %err, "failed to re-price fees");
            next.last_error = Some(err.to_string());
        }
        self.publish_if_changed(next);
    }

    fn reparse(&self, state: &mut GasState) -> Result<()> {
        let Some(data) = state.fee_data.as_ref() else {
            return Ok(());
        };
        let gas_limit = self.limits.current();
        let parse_ctx = ParseContext {
            chain_id: state.chain_id,
            gas_limit: &gas_limit,
            native_price: state.native_price.as_deref(),
            native_symbol: &state.native_symbol,
            l1_security_fee: state.l1_security_fee.as_deref(),
            flashbots: state.flashbots,
        };

        let mut by_speed = parse::parse_fee_params_by_speed(data, &parse_ctx)?;
        if let (Some(entry), Some(eip)) =
            (self.settings.custom_entry(state.chain_id), data.as_eip1559())
        {
            by_speed.custom = Some(parse::parse_custom_params(
                eip,
                &entry.max_base_fee_gwei,
                &entry.max_priority_fee_gwei,
                &parse_ctx,
            )?);
        }
        state.by_speed = Some(by_speed);
        Ok(())
    }

    /// Skip the hand-off when nothing the interactive side can see changed,
    /// so observers do not fire on every identical poll. Param sets compare
    /// by their total fee amounts.
    fn publish_if_changed(&self, next: GasState) {
        let changed = self.state.with(|current| {
            let by_speed_changed = match (current.by_speed.as_ref(), next.by_speed.as_ref()) {
                (Some(a), Some(b)) => a.fees_changed_from(b),
                (None, None) => false,
                _ => true,
            };
            by_speed_changed
                || current.chain_id != next.chain_id
                || current.fee_data != next.fee_data
                || current.l1_security_fee != next.l1_security_fee
                || current.native_price != next.native_price
                || current.native_symbol != next.native_symbol
                || current.flashbots != next.flashbots
                || current.last_error != next.last_error
        });
        if changed {
            self.state.publish(&self.ctx, next);
        }
    }

    async fn simulate_gas_limit(self: &Arc<Self>, tx: TxRequest) {
        let chain_id = tx.chain_id;
        match self.simulator.estimate_gas_limit(chain_id, &tx).await {
            Ok(gas_limit) => {
                if !self.limits.apply_simulation(chain_id, gas_limit) {
                    return;
                }
            }
            Err(err) => {
                debug!(%chain_id, error = %err, "gas simulation failed, keeping fallback");
            }
        }

        // Build the next state locally and hand it off in one piece; the
        // simulation may also have raced a chain switch
        let mut next = self.state.get();
        if next.chain_id != chain_id {
            return;
        }

        if chain_id.needs_l1_security_fee() {
            match self.l1_oracle.l1_security_fee(chain_id, &tx).await {
                Ok(fee) => next.l1_security_fee = Some(fee),
                Err(err) => {
                    debug!(%chain_id, error = %err, "l1 fee lookup failed");
                }
            }
        }

        if let Err(err) = self.reparse(&mut next) {
            warn!(%chain_id, error = %err, "failed to re-price fees");
            next.last_error = Some(err.to_string());
        }
        self.publish_if_changed(next);
    }
}
