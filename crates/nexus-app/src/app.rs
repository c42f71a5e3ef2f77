//! Application wiring.
//!
//! One feedback engine is shared as the event sink of the sync engines and
//! as the request observer of the API client. Pages are mounted through the
//! router; the frame loop runs on its own task for the life of the process.

use crate::config::AppConfig;
use crate::error::AppResult;
use nexus_api::ApiClient;
use nexus_core::{EventSink, Page};
use nexus_pulse::{FrameState, PulseEngine};
use nexus_sync::{PageRouter, SharedSurface, SyncContext};
use nexus_telemetry::Metrics;
use nexus_view::MemorySurface;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Main application.
pub struct Application {
    config: AppConfig,
    pulse: Arc<PulseEngine>,
    surface: Arc<Mutex<MemorySurface>>,
    router: PageRouter,
}

impl Application {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let pulse = Arc::new(PulseEngine::new(config.pulse.clone()));
        let sink: Arc<dyn EventSink> = pulse.clone();

        let api = ApiClient::new(&config.api)?.with_observer(Arc::clone(&sink));
        let surface = Arc::new(Mutex::new(MemorySurface::new()));
        let shared: SharedSurface = surface.clone();

        let ctx = Arc::new(SyncContext::new(
            Arc::new(api),
            sink,
            shared,
            config.sync.clone(),
        ));

        Ok(Self {
            config,
            pulse,
            surface,
            router: PageRouter::new(ctx),
        })
    }

    /// Run until Ctrl+C.
    pub async fn run(&mut self) -> AppResult<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl+C");
            }
        })
        .await
    }

    /// Mount the configured page and run until `shutdown` resolves.
    pub async fn run_until<F>(&mut self, shutdown: F) -> AppResult<()>
    where
        F: Future<Output = ()>,
    {
        let frame_handle = self.pulse.spawn();
        let page = self.navigate(&self.config.page.path.clone());
        info!(%page, base_url = %self.config.api.base_url, "Application started");

        let mut status = tokio::time::interval(Duration::from_millis(
            self.config.page.status_interval_ms,
        ));
        status.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                _ = status.tick() => {
                    self.log_status();
                }
            }
        }

        self.router.teardown();
        self.pulse.shutdown();
        if let Err(e) = frame_handle.await {
            warn!(error = %e, "Frame loop task failed");
        }

        match Metrics::encode_text() {
            Ok(text) => debug!(metrics = %text, "Final metrics"),
            Err(e) => warn!(error = %e, "Failed to encode metrics"),
        }
        info!("Application stopped");
        Ok(())
    }

    /// Switch to another page; the previous page's timers stop first.
    pub fn navigate(&mut self, path: &str) -> Page {
        self.router.navigate(path)
    }

    pub fn page(&self) -> Option<Page> {
        self.router.page()
    }

    pub fn frame(&self) -> FrameState {
        self.pulse.frame()
    }

    /// Shared handle to the rendered regions.
    pub fn surface(&self) -> Arc<Mutex<MemorySurface>> {
        Arc::clone(&self.surface)
    }

    fn log_status(&self) {
        let frame = self.pulse.frame();
        let changed: Vec<String> = {
            let mut surface = self.surface.lock();
            let changed = surface
                .region_ids()
                .filter(|id| surface.is_changed(id))
                .map(str::to_string)
                .collect();
            surface.clear_changed();
            changed
        };
        info!(
            flow = %frame.flow,
            pulse = frame.pulse,
            hue = frame.hue,
            speed = frame.speed,
            changed = ?changed,
            "Status"
        );
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("page", &self.router.page())
            .field("pulse", &self.pulse)
            .finish()
    }
}
