//! Data synchronization for the Nexus client.
//!
//! A page mounts one [`SyncEngine`] through the [`PageRouter`]. The engine
//! owns one [`Pipeline`] per poll purpose; each pipeline fetches a snapshot,
//! commits only the regions whose rendered content changed and hands the
//! semantic events it derives to the shared [`EventSink`](nexus_core::EventSink).

pub mod actions;
pub mod config;
pub mod context;
pub mod derive;
pub mod engine;
pub mod pipeline;
pub mod router;
pub mod timer;

pub use actions::{ActionOutcome, MarketActions};
pub use config::SyncConfig;
pub use context::{SharedSurface, SyncContext};
pub use derive::EventDeriver;
pub use engine::SyncEngine;
pub use pipeline::{CycleOutcome, Pipeline, Source};
pub use router::PageRouter;
pub use timer::{PollTimers, Purpose};
