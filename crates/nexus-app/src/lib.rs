//! Nexus client application.
//!
//! Wires the API client, sync engines, feedback engine and telemetry into a
//! single process that keeps one page's regions in sync with the backend.

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::{AppConfig, PageConfig};
pub use error::{AppError, AppResult};
