//! Frame loop around the feedback state machine.

use crate::config::PulseConfig;
use crate::state::{FeedbackState, FrameState};
use nexus_core::{EventSink, SemanticEvent};
use nexus_telemetry::Metrics;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

/// Owns the feedback state and advances it once per frame.
///
/// Shared as `Arc<PulseEngine>`; it is also the `EventSink` handed to the
/// API client and sync engine.
pub struct PulseEngine {
    state: Mutex<FeedbackState>,
    frame_interval: Duration,
    shutdown_token: CancellationToken,
}

impl PulseEngine {
    pub fn new(config: PulseConfig) -> Self {
        let frame_interval = config.frame_interval();
        Self {
            state: Mutex::new(FeedbackState::new(config)),
            frame_interval,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Current frame, with any due reverts applied.
    pub fn frame(&self) -> FrameState {
        let mut state = self.state.lock();
        state.expire(now());
        state.snapshot()
    }

    /// Start the frame loop on its own task.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        tokio::spawn(async move { engine.run().await })
    }

    async fn run(&self) {
        info!(
            frame_interval_ms = self.frame_interval.as_millis() as u64,
            "Feedback frame loop started"
        );
        let mut interval = tokio::time::interval(self.frame_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = self.shutdown_token.cancelled() => {
                    info!("Feedback frame loop stopped");
                    return;
                }
                _ = interval.tick() => {
                    let frame = {
                        let mut state = self.state.lock();
                        state.advance_frame(now());
                        state.snapshot()
                    };
                    Metrics::pulse_intensity(frame.pulse);
                    trace!(frame = frame.frame, pulse = frame.pulse, flow = %frame.flow, "Frame");
                }
            }
        }
    }

    /// Stop the frame loop.
    pub fn shutdown(&self) {
        self.shutdown_token.cancel();
    }
}

impl EventSink for PulseEngine {
    fn on_event(&self, event: &SemanticEvent) {
        debug!(kind = %event.kind, "Feedback event");
        Metrics::semantic_event(event.kind.as_str());
        self.state.lock().on_event(event, now());
    }
}

impl std::fmt::Debug for PulseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let frame = self.state.lock().snapshot();
        f.debug_struct("PulseEngine")
            .field("flow", &frame.flow)
            .field("pulse", &frame.pulse)
            .field("frame", &frame.frame)
            .finish()
    }
}

/// Wall clock that follows tokio's paused clock in tests.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}
