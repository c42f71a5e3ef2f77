//! Polling configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cadences and event thresholds for the sync engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Dashboard and inventory heartbeat.
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,
    /// Market ticker (indices, watchlist, portfolio).
    #[serde(default = "default_market_interval_ms")]
    pub market_interval_ms: u64,
    /// AI insight and inventory advice.
    #[serde(default = "default_insight_interval_ms")]
    pub insight_interval_ms: u64,
    /// `market_update` intensity is `processing` strictly above this.
    #[serde(default = "default_volatility_threshold")]
    pub volatility_threshold: f64,
    /// Products at or below this quantity count as low stock.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

fn default_heartbeat_interval_ms() -> u64 {
    5_000
}

fn default_market_interval_ms() -> u64 {
    15_000
}

fn default_insight_interval_ms() -> u64 {
    60_000
}

fn default_volatility_threshold() -> f64 {
    nexus_core::VOLATILITY_THRESHOLD
}

fn default_low_stock_threshold() -> i64 {
    nexus_core::LOW_STOCK_THRESHOLD
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            market_interval_ms: default_market_interval_ms(),
            insight_interval_ms: default_insight_interval_ms(),
            volatility_threshold: default_volatility_threshold(),
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

impl SyncConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn market_interval(&self) -> Duration {
        Duration::from_millis(self.market_interval_ms)
    }

    pub fn insight_interval(&self) -> Duration {
        Duration::from_millis(self.insight_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(5));
        assert_eq!(config.market_interval(), Duration::from_secs(15));
        assert_eq!(config.insight_interval(), Duration::from_secs(60));
        assert_eq!(config.volatility_threshold, 2.0);
        assert_eq!(config.low_stock_threshold, 5);
    }

    #[test]
    fn test_partial_deserialize() {
        let config: SyncConfig = serde_json::from_str(r#"{"market_interval_ms": 30000}"#).unwrap();
        assert_eq!(config.market_interval_ms, 30_000);
        assert_eq!(config.heartbeat_interval_ms, 5_000);
    }
}
