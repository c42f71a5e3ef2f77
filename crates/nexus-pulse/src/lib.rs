//! Visual feedback engine.
//!
//! A self-contained state machine fed by semantic events. It knows nothing
//! about what produced an event; it only maps event kinds to flow-state
//! transitions and decaying pulses, and advances on its own frame loop
//! independent of the polling timers.
//!
//! ```text
//!   sale ──────────► pulse(20)
//!   market_update ─► pulse(10), flow = processing | idle
//!   low_stock ─────► flow = alert (5s) ──► idle
//!   ai_insight ────► pulse(25), hue shift (2s)
//! ```

mod config;
mod engine;
mod state;

pub use config::PulseConfig;
pub use engine::PulseEngine;
pub use state::{FeedbackState, FlowState, FrameState, AI_PULSE, MARKET_PULSE, SALE_PULSE};
