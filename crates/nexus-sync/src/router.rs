//! Page routing: one engine at a time.

use crate::context::SyncContext;
use crate::engine::SyncEngine;
use nexus_core::Page;
use std::sync::Arc;
use tracing::info;

/// Owns the engine of the current page.
///
/// Navigating tears the previous engine down (timers cancelled, rendered
/// state dropped) before the next one is mounted, so timers of two pages
/// never coexist.
#[derive(Debug)]
pub struct PageRouter {
    ctx: Arc<SyncContext>,
    current: Option<SyncEngine>,
}

impl PageRouter {
    pub fn new(ctx: Arc<SyncContext>) -> Self {
        Self { ctx, current: None }
    }

    /// Mount the page for `path` and start its timers.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn navigate(&mut self, path: &str) -> Page {
        self.teardown();

        let page = Page::from_path(path);
        info!(path, %page, "Navigating");
        let mut engine = SyncEngine::new(page, Arc::clone(&self.ctx));
        engine.start();
        self.current = Some(engine);
        page
    }

    pub fn current(&self) -> Option<&SyncEngine> {
        self.current.as_ref()
    }

    pub fn page(&self) -> Option<Page> {
        self.current.as_ref().map(SyncEngine::page)
    }

    /// Stop and drop the current engine.
    pub fn teardown(&mut self) {
        if let Some(mut engine) = self.current.take() {
            engine.stop();
        }
    }
}

impl Drop for PageRouter {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use crate::context::SharedSurface;
    use crate::timer::Purpose;
    use nexus_api::{ApiClient, ApiConfig};
    use nexus_core::{EventSink, SemanticEvent};
    use nexus_view::MemorySurface;
    use parking_lot::Mutex;

    struct NullSink;

    impl EventSink for NullSink {
        fn on_event(&self, _event: &SemanticEvent) {}
    }

    fn router() -> PageRouter {
        let surface: SharedSurface = Arc::new(Mutex::new(MemorySurface::new()));
        PageRouter::new(Arc::new(SyncContext::new(
            Arc::new(ApiClient::new(&ApiConfig::default()).unwrap()),
            Arc::new(NullSink),
            surface,
            SyncConfig::default(),
        )))
    }

    #[tokio::test]
    async fn test_navigate_replaces_engine() {
        let mut router = router();
        assert_eq!(router.navigate("/dashboard"), Page::Dashboard);
        assert!(router.current().unwrap().is_running(Purpose::Heartbeat));

        assert_eq!(router.navigate("/market?tab=watchlist"), Page::Market);
        let engine = router.current().unwrap();
        assert!(!engine.is_running(Purpose::Heartbeat));
        assert!(engine.is_running(Purpose::MarketRefresh));
        assert_eq!(engine.active_timers(), 2);
    }

    #[tokio::test]
    async fn test_static_page_has_no_timers() {
        let mut router = router();
        assert_eq!(router.navigate("/suppliers"), Page::Static);
        assert_eq!(router.current().unwrap().active_timers(), 0);

        router.teardown();
        assert!(router.page().is_none());
    }
}
