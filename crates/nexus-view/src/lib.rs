//! View-models and region renderers.
//!
//! Rendering is split in three layers:
//! - `model`: typed view-models, one record per row, built from snapshot sections
//! - `render`: pure functions from a section to HTML fragments per region
//! - `slot`: the per-region rendered-state cache that decides whether a
//!   fragment actually touches the `Surface`
//!
//! The `Surface` stands in for the DOM so everything here is testable
//! without a browser.

pub mod format;
pub mod modal;
pub mod model;
pub mod render;
pub mod slot;
pub mod surface;

pub use modal::TradeModal;
pub use render::{Fragment, Renderer};
pub use slot::RegionSlot;
pub use surface::{MemorySurface, RegionState, Surface};
