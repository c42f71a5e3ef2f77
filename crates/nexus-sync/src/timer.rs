//! Poll timers: one cancellable task per purpose.
//!
//! Each timer runs `tick; cycle.await` sequentially, so cycles of one purpose
//! never overlap and ticks missed during a slow cycle are skipped. The first
//! tick completes immediately, which gives the initial render pass.

use nexus_telemetry::Metrics;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// What a timer refreshes. At most one timer per purpose is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    Heartbeat,
    MarketRefresh,
    InsightRefresh,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Heartbeat => "heartbeat",
            Self::MarketRefresh => "marketRefresh",
            Self::InsightRefresh => "insightRefresh",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct PollTimer {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Decrements the active-timer gauge however the task ends.
struct ActiveGuard;

impl ActiveGuard {
    fn new() -> Self {
        Metrics::timer_started();
        Self
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        Metrics::timer_stopped();
    }
}

/// Timer handles for one page.
///
/// Dropping the registry cancels every timer it holds.
#[derive(Default)]
pub struct PollTimers {
    timers: HashMap<Purpose, PollTimer>,
}

impl PollTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timer for `purpose`, cancelling any previous one.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<F, Fut>(&mut self, purpose: Purpose, period: Duration, mut cycle: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel(purpose);

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let guard = ActiveGuard::new();

        let handle = tokio::spawn(async move {
            let _guard = guard;
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    _ = interval.tick() => {}
                }
                // A cancelled in-flight cycle is dropped at its next await;
                // region commits happen between awaits so none is left torn.
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    () = cycle() => {}
                }
            }
            debug!(%purpose, "Poll timer stopped");
        });

        info!(%purpose, period_ms = period.as_millis() as u64, "Poll timer started");
        self.timers.insert(purpose, PollTimer { token, handle });
    }

    /// Cancel the timer for `purpose`, if any.
    pub fn cancel(&mut self, purpose: Purpose) {
        if let Some(timer) = self.timers.remove(&purpose) {
            timer.token.cancel();
            timer.handle.abort();
        }
    }

    /// Cancel every timer.
    pub fn cancel_all(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.token.cancel();
            timer.handle.abort();
        }
    }

    /// Whether a timer for `purpose` is registered and still running.
    pub fn is_active(&self, purpose: Purpose) -> bool {
        self.timers
            .get(&purpose)
            .map(|t| !t.handle.is_finished())
            .unwrap_or(false)
    }

    /// Number of registered timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl Drop for PollTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl fmt::Debug for PollTimers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollTimers")
            .field("purposes", &self.timers.keys().collect::<Vec<_>>())
            .finish()
    }
}
