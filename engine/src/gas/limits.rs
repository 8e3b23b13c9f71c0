//! # Gas-Limit Tracking
//!
//! Holds the gas limit used to price the pending swap. Starts from a static
//! per-chain fallback and upgrades to simulated values as they arrive.
//! Simulation results are tagged with the chain they were run against so a
//! late result from a previous chain can never clobber the current one.

use parking_lot::RwLock;
use shared::ChainId;
use tracing::debug;

#[derive(Debug, Clone)]
struct LimitState {
    chain_id: ChainId,
    gas_limit: String,
    simulated: bool,
}

/// Chain-tagged gas-limit store.
pub struct GasLimitStore {
    state: RwLock<LimitState>,
}

impl GasLimitStore {
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            state: RwLock::new(LimitState {
                chain_id,
                gas_limit: chain_id.basic_swap_gas_limit().to_string(),
                simulated: false,
            }),
        }
    }

    /// The gas limit currently used for fee math, in gas units.
    pub fn current(&self) -> String {
        self.state.read().gas_limit.clone()
    }

    /// Whether the current value came from a simulation rather than the
    /// static fallback.
    pub fn is_simulated(&self) -> bool {
        self.state.read().simulated
    }

    /// Switch chains, resetting to the new chain's static fallback.
    pub fn set_chain(&self, chain_id: ChainId) {
        let mut state = self.state.write();
        if state.chain_id == chain_id {
            return;
        }
        *state = LimitState {
            chain_id,
            gas_limit: chain_id.basic_swap_gas_limit().to_string(),
            simulated: false,
        };
    }

    /// Apply a simulation result, unless it raced a chain switch.
    ///
    /// Returns whether the result was applied.
    pub fn apply_simulation(&self, chain_id: ChainId, gas_limit: String) -> bool {
        let mut state = self.state.write();
        if state.chain_id != chain_id {
            debug!(
                stale_chain = %chain_id,
                current_chain = %state.chain_id,
                "dropping stale gas-limit simulation"
            );
            return false;
        }
        debug!(%chain_id, gas_limit, "applying simulated gas limit");
        state.gas_limit = gas_limit;
        state.simulated = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_from_chain_fallback() {
        let store = GasLimitStore::new(ChainId::MAINNET);
        assert_eq!(store.current(), "350000");
        assert!(!store.is_simulated());

        let store = GasLimitStore::new(ChainId::ARBITRUM);
        assert_eq!(store.current(), "1000000");
    }

    #[test]
    fn test_simulation_upgrades_fallback() {
        let store = GasLimitStore::new(ChainId::MAINNET);
        assert!(store.apply_simulation(ChainId::MAINNET, "421000".to_string()));
        assert_eq!(store.current(), "421000");
        assert!(store.is_simulated());
    }

    #[test]
    fn test_stale_cross_chain_result_dropped() {
        let store = GasLimitStore::new(ChainId::MAINNET);
        // User switches to Arbitrum while a mainnet simulation is in flight
        store.set_chain(ChainId::ARBITRUM);
        assert!(!store.apply_simulation(ChainId::MAINNET, "421000".to_string()));
        assert_eq!(store.current(), "1000000");
        assert!(!store.is_simulated());

        // The Arbitrum result still lands
        assert!(store.apply_simulation(ChainId::ARBITRUM, "900000".to_string()));
        assert_eq!(store.current(), "900000");
    }

    #[test]
    fn test_set_chain_same_chain_keeps_simulation() {
        let store = GasLimitStore::new(ChainId::MAINNET);
        store.apply_simulation(ChainId::MAINNET, "421000".to_string());
        store.set_chain(ChainId::MAINNET);
        assert_eq!(store.current(), "421000");
        assert!(store.is_simulated());
    }
}
