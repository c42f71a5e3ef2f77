//! Render target abstraction.

use std::collections::BTreeMap;

/// Something renderers can commit HTML into, region by region.
pub trait Surface: Send {
    /// Replace a region's content.
    fn set_html(&mut self, region: &str, html: &str);

    /// Flag a region as visually "changed" (drives the highlight animation).
    fn mark_changed(&mut self, region: &str);

    /// Currently selected value of a dropdown region, if any.
    fn selected_value(&self, region: &str) -> Option<String>;
}

/// Committed state of one region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionState {
    pub html: String,
    pub changed: bool,
    /// Number of `set_html` calls that reached this region.
    pub mutations: u64,
    pub selected: Option<String>,
}

/// In-memory surface.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    regions: BTreeMap<String, RegionState>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self, region: &str) -> Option<&RegionState> {
        self.regions.get(region)
    }

    pub fn html(&self, region: &str) -> Option<&str> {
        self.regions.get(region).map(|r| r.html.as_str())
    }

    pub fn is_changed(&self, region: &str) -> bool {
        self.regions.get(region).map(|r| r.changed).unwrap_or(false)
    }

    pub fn mutations(&self, region: &str) -> u64 {
        self.regions.get(region).map(|r| r.mutations).unwrap_or(0)
    }

    /// Simulate the user picking a dropdown value.
    pub fn select(&mut self, region: &str, value: impl Into<String>) {
        self.regions.entry(region.to_string()).or_default().selected = Some(value.into());
    }

    /// Clear every "changed" marker (the highlight animation finished).
    pub fn clear_changed(&mut self) {
        for state in self.regions.values_mut() {
            state.changed = false;
        }
    }

    /// Region ids in order.
    pub fn region_ids(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }
}

impl Surface for MemorySurface {
    fn set_html(&mut self, region: &str, html: &str) {
        let state = self.regions.entry(region.to_string()).or_default();
        state.html = html.to_string();
        state.mutations += 1;
    }

    fn mark_changed(&mut self, region: &str) {
        self.regions.entry(region.to_string()).or_default().changed = true;
    }

    fn selected_value(&self, region: &str) -> Option<String> {
        self.regions.get(region).and_then(|r| r.selected.clone())
    }
}
