//! Dependencies shared by every pipeline on every page.

use crate::config::SyncConfig;
use nexus_api::ApiClient;
use nexus_core::EventSink;
use nexus_view::Surface;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Surface shared between pipelines and user actions.
///
/// Locked only for synchronous render/commit sections, never across `.await`.
pub type SharedSurface = Arc<Mutex<dyn Surface>>;

/// What an engine needs from the application. Built once and outlives
/// every page.
pub struct SyncContext {
    pub api: Arc<ApiClient>,
    pub sink: Arc<dyn EventSink>,
    pub surface: SharedSurface,
    pub config: SyncConfig,
}

impl SyncContext {
    pub fn new(
        api: Arc<ApiClient>,
        sink: Arc<dyn EventSink>,
        surface: SharedSurface,
        config: SyncConfig,
    ) -> Self {
        Self {
            api,
            sink,
            surface,
            config,
        }
    }
}

impl fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncContext")
            .field("api", &self.api)
            .field("config", &self.config)
            .finish()
    }
}
