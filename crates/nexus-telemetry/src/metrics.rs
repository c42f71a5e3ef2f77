//! Prometheus metrics for the Nexus client.
//!
//! Covers:
//! - Poll cycles per timer purpose and their outcome
//! - Requests and fetch failures per endpoint
//! - Region commits vs. skipped (unchanged) renders
//! - Semantic events and the feedback flow state
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. A registration failure
//! means duplicate metric names, a programming error that should crash at
//! first use rather than silently drop metrics.

use crate::error::{TelemetryError, TelemetryResult};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge, register_gauge_vec, register_histogram_vec,
    register_int_gauge, CounterVec, Encoder, Gauge, GaugeVec, HistogramVec, IntGauge,
    TextEncoder,
};

/// Poll cycles by purpose and outcome (`applied` or `skipped`).
pub static POLL_CYCLES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "nexus_poll_cycles_total",
        "Poll cycles by timer purpose and outcome",
        &["purpose", "outcome"]
    )
    .unwrap()
});

/// Requests issued per endpoint.
pub static REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "nexus_requests_total",
        "Requests issued per endpoint",
        &["endpoint"]
    )
    .unwrap()
});

/// Fetch failures by endpoint and failure kind.
pub static FETCH_FAILURES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "nexus_fetch_failures_total",
        "Fetch failures by endpoint and kind (transport/status/decode/application)",
        &["endpoint", "kind"]
    )
    .unwrap()
});

/// Request latency in milliseconds.
pub static FETCH_LATENCY_MS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "nexus_fetch_latency_ms",
        "Request latency in milliseconds",
        &["endpoint"],
        vec![5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0]
    )
    .unwrap()
});

/// Regions whose content changed and was committed.
pub static REGION_COMMITS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "nexus_region_commits_total",
        "Region renders that changed the surface",
        &["region"]
    )
    .unwrap()
});

/// Regions whose rendered content was identical and left untouched.
pub static REGION_SKIPS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "nexus_region_skips_total",
        "Region renders skipped because content was unchanged",
        &["region"]
    )
    .unwrap()
});

/// Semantic events delivered to the sink.
pub static SEMANTIC_EVENTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "nexus_semantic_events_total",
        "Semantic events by kind",
        &["kind"]
    )
    .unwrap()
});

/// Feedback flow state (1 = active).
pub static FLOW_STATE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "nexus_flow_state",
        "Feedback flow state (1=active, 0=inactive)",
        &["state"]
    )
    .unwrap()
});

/// Current pulse intensity.
pub static PULSE_INTENSITY: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!("nexus_pulse_intensity", "Current feedback pulse intensity").unwrap()
});

/// Poll timers currently running.
pub static ACTIVE_TIMERS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("nexus_active_timers", "Poll timers currently running").unwrap()
});

/// Metrics helper struct.
pub struct Metrics;

impl Metrics {
    /// Record a finished poll cycle.
    pub fn poll_cycle(purpose: &str, outcome: &str) {
        POLL_CYCLES_TOTAL
            .with_label_values(&[purpose, outcome])
            .inc();
    }

    /// Record an outgoing request.
    pub fn request(endpoint: &str) {
        REQUESTS_TOTAL.with_label_values(&[endpoint]).inc();
    }

    /// Record a failed fetch.
    pub fn fetch_failure(endpoint: &str, kind: &str) {
        FETCH_FAILURES_TOTAL
            .with_label_values(&[endpoint, kind])
            .inc();
    }

    /// Record request latency.
    pub fn fetch_latency(endpoint: &str, latency_ms: f64) {
        FETCH_LATENCY_MS
            .with_label_values(&[endpoint])
            .observe(latency_ms);
    }

    /// Record a region commit.
    pub fn region_committed(region: &str) {
        REGION_COMMITS_TOTAL.with_label_values(&[region]).inc();
    }

    /// Record a skipped (unchanged) region render.
    pub fn region_skipped(region: &str) {
        REGION_SKIPS_TOTAL.with_label_values(&[region]).inc();
    }

    /// Record a semantic event.
    pub fn semantic_event(kind: &str) {
        SEMANTIC_EVENTS_TOTAL.with_label_values(&[kind]).inc();
    }

    /// Set the active flow state; all others go to 0.
    pub fn flow_state_set(state: &str) {
        for s in &["idle", "processing", "alert"] {
            FLOW_STATE.with_label_values(&[s]).set(0.0);
        }
        FLOW_STATE.with_label_values(&[state]).set(1.0);
    }

    /// Set current pulse intensity.
    pub fn pulse_intensity(value: f64) {
        PULSE_INTENSITY.set(value);
    }

    /// A poll timer started.
    pub fn timer_started() {
        ACTIVE_TIMERS.inc();
    }

    /// A poll timer stopped.
    pub fn timer_stopped() {
        ACTIVE_TIMERS.dec();
    }

    /// Encode the default registry in the Prometheus text format.
    pub fn encode_text() -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&prometheus::gather(), &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment() {
        let before = REGION_SKIPS_TOTAL.with_label_values(&["test-region"]).get();
        Metrics::region_skipped("test-region");
        Metrics::region_skipped("test-region");
        let after = REGION_SKIPS_TOTAL.with_label_values(&["test-region"]).get();
        assert_eq!(after - before, 2.0);
    }

    #[test]
    fn test_flow_state_exclusive() {
        Metrics::flow_state_set("alert");
        assert_eq!(FLOW_STATE.with_label_values(&["alert"]).get(), 1.0);
        assert_eq!(FLOW_STATE.with_label_values(&["idle"]).get(), 0.0);
    }

    #[test]
    fn test_encode_text() {
        Metrics::request("summary");
        let text = Metrics::encode_text().unwrap();
        assert!(text.contains("nexus_requests_total"));
    }
}
