//! HTTP client for the inventory/market backend.
//!
//! The backend is treated as a set of opaque JSON endpoints. Polling reads go
//! through [`ApiClient::fetch`], which never fails: transport errors, non-2xx
//! statuses, malformed bodies and `{"error": ...}` bodies are logged and
//! collapsed to `None`. User-initiated mutations keep the [`ApiError`] so the
//! server's message can be shown.

pub mod client;
pub mod endpoint;
pub mod error;

pub use client::{ApiClient, ApiConfig};
pub use endpoint::Endpoint;
pub use error::{ApiError, ApiResult};
