//! # Gas Speed & Custom Settings
//!
//! Tracks the selected speed and user-entered custom fees, both keyed by
//! chain. Custom entries persist across chain switches and oracle refreshes
//! until the user clears them; switching back to a chain restores its
//! custom fees exactly as left.

use parking_lot::RwLock;
use shared::{ChainId, GasFeeParams, GasFeeParamsBySpeed, GasSettings, GasSpeed};
use std::collections::HashMap;

/// User-entered custom fees for one chain, in gwei as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomGasEntry {
    pub max_base_fee_gwei: String,
    pub max_priority_fee_gwei: String,
}

/// Per-chain speed selection and custom fee storage.
pub struct GasSettingsStore {
    selected_speed: RwLock<HashMap<ChainId, GasSpeed>>,
    custom: RwLock<HashMap<ChainId, CustomGasEntry>>,
}

impl GasSettingsStore {
    pub fn new() -> Self {
        Self {
            selected_speed: RwLock::new(HashMap::new()),
            custom: RwLock::new(HashMap::new()),
        }
    }

    /// Default speed for a chain: chains with cheap, fast blocks default to
    /// fast, the rest to normal.
    pub fn default_speed(chain_id: ChainId) -> GasSpeed {
        if chain_id.uses_default_tx_speed() {
            GasSpeed::Normal
        } else {
            GasSpeed::Fast
        }
    }

    /// The speed the user selected on this chain, or the chain default.
    pub fn selected_speed(&self, chain_id: ChainId) -> GasSpeed {
        self.selected_speed
            .read()
            .get(&chain_id)
            .copied()
            .unwrap_or_else(|| Self::default_speed(chain_id))
    }

    pub fn set_selected_speed(&self, chain_id: ChainId, speed: GasSpeed) {
        self.selected_speed.write().insert(chain_id, speed);
    }

    /// The speed actually used for pricing: `Custom` without stored custom
    /// fees falls back to `Fast`.
    pub fn effective_speed(&self, chain_id: ChainId) -> GasSpeed {
        let selected = self.selected_speed(chain_id);
        if selected == GasSpeed::Custom && self.custom_entry(chain_id).is_none() {
            GasSpeed::Fast
        } else {
            selected
        }
    }

    pub fn custom_entry(&self, chain_id: ChainId) -> Option<CustomGasEntry> {
        self.custom.read().get(&chain_id).cloned()
    }

    /// Whether the user has edited custom fees on this chain.
    pub fn custom_modified(&self, chain_id: ChainId) -> bool {
        self.custom.read().contains_key(&chain_id)
    }

    pub fn set_custom(&self, chain_id: ChainId, entry: CustomGasEntry) {
        self.custom.write().insert(chain_id, entry);
    }

    pub fn clear_custom(&self, chain_id: ChainId) {
        self.custom.write().remove(&chain_id);
    }

    /// The settings used to price a transaction on this chain, resolved from
    /// the current per-speed parameter set.
    pub fn gas_settings(
        &self,
        chain_id: ChainId,
        by_speed: &GasFeeParamsBySpeed,
    ) -> GasSettings {
        settings_from_params(by_speed.get(self.effective_speed(chain_id)))
    }
}

impl Default for GasSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a parameter set down to the fields a transaction carries.
pub fn settings_from_params(params: &GasFeeParams) -> GasSettings {
    match params {
        GasFeeParams::Eip1559(p) => GasSettings::Eip1559 {
            max_base_fee: p.max_base_fee.amount.clone(),
            max_priority_fee: p.max_priority_fee.amount.clone(),
        },
        GasFeeParams::Legacy(p) => GasSettings::Legacy { gas_price: p.gas_price.amount.clone() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(base: &str, priority: &str) -> CustomGasEntry {
        CustomGasEntry {
            max_base_fee_gwei: base.to_string(),
            max_priority_fee_gwei: priority.to_string(),
        }
    }

    #[test]
    fn test_default_speeds() {
        assert_eq!(GasSettingsStore::default_speed(ChainId::MAINNET), GasSpeed::Normal);
        assert_eq!(GasSettingsStore::default_speed(ChainId::POLYGON), GasSpeed::Normal);
        assert_eq!(GasSettingsStore::default_speed(ChainId::OPTIMISM), GasSpeed::Fast);
    }

    #[test]
    fn test_custom_without_entry_falls_back_to_fast() {
        let store = GasSettingsStore::new();
        store.set_selected_speed(ChainId::MAINNET, GasSpeed::Custom);
        assert_eq!(store.selected_speed(ChainId::MAINNET), GasSpeed::Custom);
        assert_eq!(store.effective_speed(ChainId::MAINNET), GasSpeed::Fast);

        store.set_custom(ChainId::MAINNET, entry("20", "2"));
        assert_eq!(store.effective_speed(ChainId::MAINNET), GasSpeed::Custom);
    }

    #[test]
    fn test_custom_persists_per_chain() {
        let store = GasSettingsStore::new();
        store.set_custom(ChainId::MAINNET, entry("20", "2"));
        store.set_custom(ChainId::OPTIMISM, entry("0.1", "0.01"));

        // Switching chains does not disturb either entry
        assert_eq!(store.custom_entry(ChainId::MAINNET), Some(entry("20", "2")));
        assert_eq!(store.custom_entry(ChainId::OPTIMISM), Some(entry("0.1", "0.01")));

        store.clear_custom(ChainId::MAINNET);
        assert!(store.custom_entry(ChainId::MAINNET).is_none());
        assert!(!store.custom_modified(ChainId::MAINNET));
        assert_eq!(store.custom_entry(ChainId::OPTIMISM), Some(entry("0.1", "0.01")));
    }

    #[test]
    fn test_speed_selection_is_per_chain() {
        let store = GasSettingsStore::new();
        store.set_selected_speed(ChainId::MAINNET, GasSpeed::Urgent);
        assert_eq!(store.selected_speed(ChainId::MAINNET), GasSpeed::Urgent);
        assert_eq!(store.selected_speed(ChainId::OPTIMISM), GasSpeed::Fast);
    }
}
