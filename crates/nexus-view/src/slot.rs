//! Per-region rendered-state cache.

use crate::surface::Surface;
use nexus_telemetry::Metrics;
use tracing::trace;

/// Last committed content of one region.
///
/// Owned by the engine that renders the region and dropped with it, so
/// navigating away discards the cache.
#[derive(Debug, Clone)]
pub struct RegionSlot {
    region: &'static str,
    last: Option<String>,
}

impl RegionSlot {
    pub fn new(region: &'static str) -> Self {
        Self { region, last: None }
    }

    pub fn region(&self) -> &'static str {
        self.region
    }

    /// Last committed content, if the region has been rendered.
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    /// Commit `html` if it differs from what is displayed.
    ///
    /// Returns `true` when the surface was touched. Identical content is a
    /// no-op: no mutation, no "changed" marker.
    pub fn commit(&mut self, html: String, surface: &mut dyn Surface) -> bool {
        if self.last.as_deref() == Some(html.as_str()) {
            Metrics::region_skipped(self.region);
            return false;
        }

        surface.set_html(self.region, &html);
        surface.mark_changed(self.region);
        Metrics::region_committed(self.region);
        trace!(region = self.region, bytes = html.len(), "Region committed");
        self.last = Some(html);
        true
    }
}
