//! Semantic events and the sink that consumes them.
//!
//! Events are ephemeral: they are produced by the sync engine (or the API
//! client, for `refresh`), handed to an `EventSink` synchronously and never
//! queued.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Volatility above which a market update is considered elevated.
pub const VOLATILITY_THRESHOLD: f64 = 2.0;

/// Kind of a semantic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Revenue went up.
    Sale,
    /// At least one product is at or below the low-stock threshold.
    LowStock,
    /// Fresh market quotes arrived.
    MarketUpdate,
    /// A request is about to be issued.
    Refresh,
    /// A new AI insight text is available.
    AiInsight,
}

impl EventKind {
    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::LowStock => "low_stock",
            Self::MarketUpdate => "market_update",
            Self::Refresh => "refresh",
            Self::AiInsight => "ai_insight",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intensity carried by a `market_update` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowIntensity {
    Idle,
    Processing,
}

impl FlowIntensity {
    /// Classify a volatility value. Strictly greater than the threshold is elevated.
    pub fn from_volatility(volatility: f64, threshold: f64) -> Self {
        if volatility > threshold {
            Self::Processing
        } else {
            Self::Idle
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
        }
    }
}

/// A named, payload-carrying notification of a business-meaningful change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticEvent {
    pub kind: EventKind,
    pub payload: Map<String, Value>,
}

impl SemanticEvent {
    /// Create an event with an empty payload.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            payload: Map::new(),
        }
    }

    /// Builder-style payload insertion.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    /// `sale` carrying the revenue increase since the last cycle.
    pub fn sale(amount: f64) -> Self {
        Self::new(EventKind::Sale).with("amount", amount)
    }

    /// `low_stock` carrying the number of low-stock products.
    pub fn low_stock(count: u64) -> Self {
        Self::new(EventKind::LowStock).with("count", count)
    }

    /// `market_update` carrying volatility and the derived intensity.
    pub fn market_update(volatility: f64, threshold: f64) -> Self {
        let intensity = FlowIntensity::from_volatility(volatility, threshold);
        Self::new(EventKind::MarketUpdate)
            .with("volatility", volatility)
            .with("intensity", intensity.as_str())
    }

    /// `refresh` carrying the endpoint name about to be fetched.
    pub fn refresh(endpoint: &str) -> Self {
        Self::new(EventKind::Refresh).with("endpoint", endpoint)
    }

    /// `ai_insight` carrying the insight text.
    pub fn ai_insight(text: &str) -> Self {
        Self::new(EventKind::AiInsight).with("text", text)
    }

    /// Numeric payload field, if present.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.payload.get(key).and_then(Value::as_f64)
    }

    /// String payload field, if present.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }

    /// Volatility of a `market_update`, 0.0 when absent.
    pub fn volatility(&self) -> f64 {
        self.number("volatility").unwrap_or(0.0)
    }

    /// Flow intensity of a `market_update`, as classified by its producer.
    ///
    /// Events without an `intensity` field are classified against the
    /// default threshold.
    pub fn intensity(&self) -> FlowIntensity {
        match self.text("intensity") {
            Some("processing") => FlowIntensity::Processing,
            Some(_) => FlowIntensity::Idle,
            None => FlowIntensity::from_volatility(self.volatility(), VOLATILITY_THRESHOLD),
        }
    }
}

/// Consumer of semantic events.
///
/// Implementations must not block: events are delivered inline from poll
/// cycles and request paths.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &SemanticEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_boundary() {
        let cases = [
            (0.0, FlowIntensity::Idle),
            (1.5, FlowIntensity::Idle),
            (2.0, FlowIntensity::Idle),
            (2.1, FlowIntensity::Processing),
            (5.0, FlowIntensity::Processing),
        ];
        for (volatility, expected) in cases {
            assert_eq!(
                FlowIntensity::from_volatility(volatility, VOLATILITY_THRESHOLD),
                expected,
                "volatility {volatility}"
            );
        }
    }

    #[test]
    fn test_market_update_payload_shape() {
        let event = SemanticEvent::market_update(2.5, VOLATILITY_THRESHOLD);
        assert_eq!(event.kind, EventKind::MarketUpdate);
        assert_eq!(event.volatility(), 2.5);
        assert_eq!(event.text("intensity"), Some("processing"));
        assert_eq!(event.intensity(), FlowIntensity::Processing);

        // The producer's threshold decides, not the default one.
        let calm = SemanticEvent::market_update(2.5, 3.0);
        assert_eq!(calm.intensity(), FlowIntensity::Idle);
    }

    #[test]
    fn test_event_serialization() {
        let event = SemanticEvent::low_stock(3);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"low_stock\""));
        assert!(json.contains("\"count\":3"));
    }
}
