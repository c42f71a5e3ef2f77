//! Prometheus metrics and structured logging for the Nexus client.
//!
//! - Structured logging with tracing (JSON in production, pretty otherwise)
//! - Prometheus counters for poll cycles, fetch failures, renders and events

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
