//! Feedback engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Feedback engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseConfig {
    /// Frame loop period in milliseconds.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    /// Per-frame pulse decay factor.
    #[serde(default = "default_decay")]
    pub decay: f64,
    /// How long `low_stock` holds the alert state.
    #[serde(default = "default_alert_hold_ms")]
    pub alert_hold_ms: u64,
    /// How long `ai_insight` shifts the hue.
    #[serde(default = "default_hue_shift_ms")]
    pub hue_shift_ms: u64,
    /// How long a pulse boosts motion speed.
    #[serde(default = "default_speed_boost_ms")]
    pub speed_boost_ms: u64,
    /// Speed multiplier while boosted.
    #[serde(default = "default_speed_boost_factor")]
    pub speed_boost_factor: f64,
    /// Motion speed at rest.
    #[serde(default = "default_base_speed")]
    pub base_speed: f64,
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_decay() -> f64 {
    0.95
}

fn default_alert_hold_ms() -> u64 {
    5_000
}

fn default_hue_shift_ms() -> u64 {
    2_000
}

fn default_speed_boost_ms() -> u64 {
    500
}

fn default_speed_boost_factor() -> f64 {
    3.0
}

fn default_base_speed() -> f64 {
    1.0
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
            decay: default_decay(),
            alert_hold_ms: default_alert_hold_ms(),
            hue_shift_ms: default_hue_shift_ms(),
            speed_boost_ms: default_speed_boost_ms(),
            speed_boost_factor: default_speed_boost_factor(),
            base_speed: default_base_speed(),
        }
    }
}

impl PulseConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    pub fn alert_hold(&self) -> Duration {
        Duration::from_millis(self.alert_hold_ms)
    }

    pub fn hue_shift(&self) -> Duration {
        Duration::from_millis(self.hue_shift_ms)
    }

    pub fn speed_boost(&self) -> Duration {
        Duration::from_millis(self.speed_boost_ms)
    }
}
