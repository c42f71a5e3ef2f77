//! Feedback state machine.
//!
//! Time is passed in explicitly so the machine is deterministic; the engine
//! supplies the clock.

use crate::config::PulseConfig;
use nexus_core::{EventKind, FlowIntensity, SemanticEvent};
use nexus_telemetry::Metrics;
use std::fmt;
use std::time::Instant;
use tracing::debug;

/// Pulse raised by a `sale`.
pub const SALE_PULSE: f64 = 20.0;
/// Pulse raised by a `market_update`.
pub const MARKET_PULSE: f64 = 10.0;
/// Pulse raised by an `ai_insight`.
pub const AI_PULSE: f64 = 25.0;

/// Degrees added to the hue while an AI insight is showing.
const AI_HUE_SHIFT_DEG: f64 = 120.0;

/// Ambient mode of the visual feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    Processing,
    Alert,
}

impl FlowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::Alert => "alert",
        }
    }

    /// Base hue in degrees.
    fn hue(&self) -> f64 {
        match self {
            Self::Idle => 190.0,
            Self::Processing => 270.0,
            Self::Alert => 0.0,
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a renderer needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub flow: FlowState,
    pub pulse: f64,
    pub speed: f64,
    pub hue: f64,
    pub frame: u64,
}

/// Active speed boost: the speed to restore and when.
#[derive(Debug, Clone, Copy)]
struct SpeedBoost {
    restore_to: f64,
    until: Instant,
}

/// Flow state, decaying pulse and timed reverts.
#[derive(Debug, Clone)]
pub struct FeedbackState {
    config: PulseConfig,
    flow: FlowState,
    pulse: f64,
    speed: f64,
    /// Set while a `low_stock` alert is holding.
    alert_until: Option<Instant>,
    hue_shift_until: Option<Instant>,
    boost: Option<SpeedBoost>,
    frame: u64,
    refreshes: u64,
}

impl FeedbackState {
    pub fn new(config: PulseConfig) -> Self {
        let speed = config.base_speed;
        Self {
            config,
            flow: FlowState::Idle,
            pulse: 0.0,
            speed,
            alert_until: None,
            hue_shift_until: None,
            boost: None,
            frame: 0,
            refreshes: 0,
        }
    }

    /// Map a semantic event to transitions and pulses.
    pub fn on_event(&mut self, event: &SemanticEvent, now: Instant) {
        self.expire(now);

        match event.kind {
            EventKind::Sale => self.trigger_pulse(SALE_PULSE, now),
            EventKind::MarketUpdate => {
                self.trigger_pulse(MARKET_PULSE, now);
                let flow = match event.intensity() {
                    FlowIntensity::Processing => FlowState::Processing,
                    FlowIntensity::Idle => FlowState::Idle,
                };
                // A holding low-stock alert outranks market activity.
                if self.alert_until.is_none() {
                    self.set_flow(flow);
                }
            }
            EventKind::LowStock => {
                self.set_flow(FlowState::Alert);
                self.alert_until = Some(now + self.config.alert_hold());
            }
            EventKind::AiInsight => {
                self.trigger_pulse(AI_PULSE, now);
                self.hue_shift_until = Some(now + self.config.hue_shift());
            }
            EventKind::Refresh => {
                self.refreshes += 1;
            }
        }
    }

    /// Raise the pulse to at least `intensity` and boost speed.
    ///
    /// The pulse is never summed: a weaker trigger leaves a stronger decaying
    /// pulse alone. Overlapping boosts extend the window rather than compound,
    /// and the speed captured before the first boost is what gets restored.
    pub fn trigger_pulse(&mut self, intensity: f64, now: Instant) {
        self.pulse = self.pulse.max(intensity);

        let until = now + self.config.speed_boost();
        match &mut self.boost {
            Some(boost) => boost.until = until,
            None => {
                self.boost = Some(SpeedBoost {
                    restore_to: self.speed,
                    until,
                });
                self.speed *= self.config.speed_boost_factor;
            }
        }
    }

    /// Change flow state. Cancels a pending alert revert.
    pub fn set_flow(&mut self, flow: FlowState) {
        self.alert_until = None;
        if self.flow != flow {
            debug!(from = %self.flow, to = %flow, "Flow state changed");
            self.flow = flow;
            Metrics::flow_state_set(flow.as_str());
        }
    }

    /// Apply timed reverts that are due at `now`.
    pub fn expire(&mut self, now: Instant) {
        if let Some(until) = self.alert_until {
            if now >= until {
                self.set_flow(FlowState::Idle);
            }
        }
        if let Some(until) = self.hue_shift_until {
            if now >= until {
                self.hue_shift_until = None;
            }
        }
        if let Some(boost) = self.boost {
            if now >= boost.until {
                self.speed = boost.restore_to;
                self.boost = None;
            }
        }
    }

    /// Advance one animation frame: apply reverts, then decay the pulse.
    pub fn advance_frame(&mut self, now: Instant) {
        self.expire(now);
        self.pulse *= self.config.decay;
        self.frame += 1;
    }

    pub fn flow(&self) -> FlowState {
        self.flow
    }

    pub fn pulse(&self) -> f64 {
        self.pulse
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Number of `refresh` notifications seen.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    pub fn hue(&self) -> f64 {
        let base = self.flow.hue();
        if self.hue_shift_until.is_some() {
            (base + AI_HUE_SHIFT_DEG) % 360.0
        } else {
            base
        }
    }

    pub fn snapshot(&self) -> FrameState {
        FrameState {
            flow: self.flow,
            pulse: self.pulse,
            speed: self.speed,
            hue: self.hue(),
            frame: self.frame,
        }
    }
}

impl Default for FeedbackState {
    fn default() -> Self {
        Self::new(PulseConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pulse_decays_per_frame() {
        let mut state = FeedbackState::default();
        let t0 = Instant::now();
        state.trigger_pulse(20.0, t0);

        for i in 1..=10 {
            state.advance_frame(t0 + ms(16 * i));
        }

        let expected = 20.0 * 0.95_f64.powi(10);
        assert!((state.pulse() - expected).abs() < 1e-9);
        assert!((state.pulse() - 11.97).abs() < 0.01);
    }

    #[test]
    fn test_pulse_strictly_decreasing_without_events() {
        let mut state = FeedbackState::default();
        let t0 = Instant::now();
        state.trigger_pulse(25.0, t0);

        let mut last = state.pulse();
        for i in 1..=50 {
            state.advance_frame(t0 + ms(16 * i));
            assert!(state.pulse() < last);
            last = state.pulse();
        }
    }

    #[test]
    fn test_pulse_reset_upward_not_summed() {
        let mut state = FeedbackState::default();
        let t0 = Instant::now();
        state.trigger_pulse(20.0, t0);
        for i in 1..=10 {
            state.advance_frame(t0 + ms(16 * i));
        }

        // Weaker than the decayed value: unchanged.
        let decayed = state.pulse();
        state.trigger_pulse(10.0, t0 + ms(200));
        assert_eq!(state.pulse(), decayed);

        // Stronger: replaced, not added.
        state.trigger_pulse(25.0, t0 + ms(200));
        assert_eq!(state.pulse(), 25.0);
    }

    #[test]
    fn test_low_stock_alert_reverts_after_hold() {
        let mut state = FeedbackState::default();
        let t0 = Instant::now();
        state.on_event(&SemanticEvent::low_stock(2), t0);
        assert_eq!(state.flow(), FlowState::Alert);

        state.expire(t0 + ms(4_999));
        assert_eq!(state.flow(), FlowState::Alert);

        state.expire(t0 + ms(5_000));
        assert_eq!(state.flow(), FlowState::Idle);
    }

    #[test]
    fn test_market_update_does_not_interrupt_alert() {
        let mut state = FeedbackState::default();
        let t0 = Instant::now();
        state.on_event(&SemanticEvent::low_stock(3), t0);
        state.on_event(&SemanticEvent::market_update(0.4, 2.0), t0);
        assert_eq!(state.flow(), FlowState::Alert);
        assert_eq!(state.pulse(), MARKET_PULSE);

        state.on_event(&SemanticEvent::market_update(3.0, 2.0), t0 + ms(1_000));
        assert_eq!(state.flow(), FlowState::Alert);

        state.expire(t0 + ms(5_000));
        assert_eq!(state.flow(), FlowState::Idle);

        // Once the hold is over, market activity drives the flow again.
        state.on_event(&SemanticEvent::market_update(3.0, 2.0), t0 + ms(6_000));
        assert_eq!(state.flow(), FlowState::Processing);
    }

    #[test]
    fn test_repeated_low_stock_rearms_hold() {
        let mut state = FeedbackState::default();
        let t0 = Instant::now();
        state.on_event(&SemanticEvent::low_stock(1), t0);
        state.on_event(&SemanticEvent::low_stock(1), t0 + ms(4_000));

        state.expire(t0 + ms(8_999));
        assert_eq!(state.flow(), FlowState::Alert);
        state.expire(t0 + ms(9_000));
        assert_eq!(state.flow(), FlowState::Idle);
    }

    #[test]
    fn test_pulse_only_event_keeps_alert_deadline() {
        let mut state = FeedbackState::default();
        let t0 = Instant::now();
        state.on_event(&SemanticEvent::low_stock(1), t0);
        state.on_event(&SemanticEvent::sale(120.0), t0 + ms(1_000));
        assert_eq!(state.flow(), FlowState::Alert);

        state.expire(t0 + ms(5_000));
        assert_eq!(state.flow(), FlowState::Idle);
    }

    #[test]
    fn test_market_update_volatility_threshold() {
        let t0 = Instant::now();
        let cases = [
            (0.0, FlowState::Idle),
            (1.5, FlowState::Idle),
            (2.0, FlowState::Idle),
            (2.1, FlowState::Processing),
            (5.0, FlowState::Processing),
        ];
        for (volatility, expected) in cases {
            let mut state = FeedbackState::default();
            state.on_event(&SemanticEvent::market_update(volatility, 2.0), t0);
            assert_eq!(state.flow(), expected, "volatility {volatility}");
            assert_eq!(state.pulse(), MARKET_PULSE);
        }

        // The event's own classification is authoritative.
        let mut state = FeedbackState::default();
        state.on_event(&SemanticEvent::market_update(3.0, 5.0), t0);
        assert_eq!(state.flow(), FlowState::Idle);
    }

    #[test]
    fn test_speed_boost_restores_captured_speed() {
        let mut state = FeedbackState::default();
        let t0 = Instant::now();

        state.on_event(&SemanticEvent::sale(10.0), t0);
        assert_eq!(state.speed(), 3.0);

        // Overlapping pulse extends instead of compounding.
        state.on_event(&SemanticEvent::sale(20.0), t0 + ms(300));
        assert_eq!(state.speed(), 3.0);

        state.expire(t0 + ms(500));
        assert_eq!(state.speed(), 3.0);

        state.expire(t0 + ms(800));
        assert_eq!(state.speed(), 1.0);
    }

    #[test]
    fn test_ai_insight_hue_shift_reverts() {
        let mut state = FeedbackState::default();
        let t0 = Instant::now();
        let base = state.hue();

        state.on_event(&SemanticEvent::ai_insight("Bullish"), t0);
        assert_eq!(state.pulse(), AI_PULSE);
        assert_ne!(state.hue(), base);

        state.expire(t0 + ms(1_999));
        assert_ne!(state.hue(), base);

        state.expire(t0 + ms(2_000));
        assert_eq!(state.hue(), base);
    }

    #[test]
    fn test_refresh_counts_only() {
        let mut state = FeedbackState::default();
        let t0 = Instant::now();
        state.on_event(&SemanticEvent::refresh("summary"), t0);
        assert_eq!(state.refreshes(), 1);
        assert_eq!(state.pulse(), 0.0);
        assert_eq!(state.flow(), FlowState::Idle);
        assert_eq!(state.speed(), 1.0);
    }
}
