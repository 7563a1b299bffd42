//! Tuning parameters for pools and the pool store.

use crate::grow::GrowthPolicy;

/// Configuration for one pool's bookkeeping structures.
///
/// Controls the growth of the node arena and the gap index. Validated by
/// debug assertions at construction of the backing storage; all values
/// are immutable after the pool is opened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoolConfig {
    /// Growth parameters for the node arena.
    pub node_growth: GrowthPolicy,
    /// Growth parameters for the gap index.
    pub gap_growth: GrowthPolicy,
}

impl PoolConfig {
    /// Default node-arena growth: 40 slots, grow ×2 past 75% fill.
    pub const DEFAULT_NODE_GROWTH: GrowthPolicy = GrowthPolicy {
        initial_capacity: 40,
        fill_factor: 0.75,
        growth_factor: 2,
    };

    /// Default gap-index growth: 40 slots, grow ×2 past 75% fill.
    pub const DEFAULT_GAP_GROWTH: GrowthPolicy = GrowthPolicy {
        initial_capacity: 40,
        fill_factor: 0.75,
        growth_factor: 2,
    };

    /// Create a config with the default growth parameters.
    pub fn new() -> Self {
        Self {
            node_growth: Self::DEFAULT_NODE_GROWTH,
            gap_growth: Self::DEFAULT_GAP_GROWTH,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for a [`PoolStore`](crate::store::PoolStore).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StoreConfig {
    /// Growth parameters for the registry slot table.
    pub slot_growth: GrowthPolicy,
    /// Configuration applied to every pool the store opens.
    pub pool: PoolConfig,
}

impl StoreConfig {
    /// Default registry growth: 20 slots, grow ×2 past 75% fill.
    pub const DEFAULT_SLOT_GROWTH: GrowthPolicy = GrowthPolicy {
        initial_capacity: 20,
        fill_factor: 0.75,
        growth_factor: 2,
    };

    /// Create a config with the default growth parameters.
    pub fn new() -> Self {
        Self {
            slot_growth: Self::DEFAULT_SLOT_GROWTH,
            pool: PoolConfig::new(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PoolConfig::default();
        assert_eq!(config.node_growth.initial_capacity, 40);
        assert_eq!(config.gap_growth.initial_capacity, 40);
        assert_eq!(StoreConfig::default().slot_growth.initial_capacity, 20);
    }
}
