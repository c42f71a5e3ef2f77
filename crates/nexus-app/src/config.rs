//! Application configuration.

use crate::error::{AppError, AppResult};
use nexus_api::ApiConfig;
use nexus_pulse::PulseConfig;
use nexus_sync::SyncConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "NEXUS_CONFIG";

/// Which page to mount and how often to report on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Route the client starts on.
    #[serde(default = "default_path")]
    pub path: String,
    /// Period of the status log line (flow state, changed regions).
    #[serde(default = "default_status_interval_ms")]
    pub status_interval_ms: u64,
}

fn default_path() -> String {
    "/dashboard".to_string()
}

fn default_status_interval_ms() -> u64 {
    5_000
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            status_interval_ms: default_status_interval_ms(),
        }
    }
}

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub pulse: PulseConfig,
    #[serde(default)]
    pub page: PageConfig,
}

impl AppConfig {
    /// Load from `NEXUS_CONFIG` or the default path, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall or spin the timers.
    pub fn validate(&self) -> AppResult<()> {
        let intervals = [
            ("sync.heartbeat_interval_ms", self.sync.heartbeat_interval_ms),
            ("sync.market_interval_ms", self.sync.market_interval_ms),
            ("sync.insight_interval_ms", self.sync.insight_interval_ms),
            ("pulse.frame_interval_ms", self.pulse.frame_interval_ms),
            ("page.status_interval_ms", self.page.status_interval_ms),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, ms)| *ms == 0) {
            return Err(AppError::Config(format!("{name} must be greater than 0")));
        }
        if !(0.0..1.0).contains(&self.pulse.decay) {
            return Err(AppError::Config(format!(
                "pulse.decay must be in [0, 1), got {}",
                self.pulse.decay
            )));
        }
        if self.api.base_url.is_empty() {
            return Err(AppError::Config("api.base_url must not be empty".to_string()));
        }
        Ok(())
    }
}
