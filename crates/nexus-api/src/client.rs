//! HTTP client for the backend JSON endpoints.

use crate::endpoint::Endpoint;
use crate::error::{ApiError, ApiResult};
use nexus_core::{EventSink, SemanticEvent, TradeRequest};
use nexus_telemetry::Metrics;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend root, e.g. `http://127.0.0.1:5000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Client for the backend endpoints.
///
/// Cheap to share behind an `Arc`; every call is independent, so callers may
/// issue several concurrently and must tolerate any subset returning `None`.
pub struct ApiClient {
    client: Client,
    base_url: String,
    /// Notified with a `refresh` event before every request.
    observer: Option<Arc<dyn EventSink>>,
}

impl ApiClient {
    /// Create a new client.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ApiError::Client(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            observer: None,
        })
    }

    /// Attach the sink that receives `refresh` events.
    pub fn with_observer(mut self, observer: Arc<dyn EventSink>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch an endpoint for a poll cycle.
    ///
    /// Never fails: every error kind is logged, counted and returned as `None`,
    /// meaning "no update this cycle".
    pub async fn fetch(&self, endpoint: &Endpoint) -> Option<Value> {
        match self.send(endpoint).await {
            Ok(body) => Some(body),
            Err(e) => {
                record_failure(endpoint, &e);
                None
            }
        }
    }

    /// Fetch and decode into `T`. A shape mismatch counts as a malformed body.
    pub async fn fetch_as<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Option<T> {
        let body = self.fetch(endpoint).await?;
        match serde_json::from_value(body) {
            Ok(value) => Some(value),
            Err(e) => {
                record_failure(endpoint, &ApiError::Decode(e.to_string()));
                None
            }
        }
    }

    /// Add a symbol to the watchlist.
    pub async fn add_to_watchlist(&self, symbol: &str) -> ApiResult<Value> {
        self.send(&Endpoint::AddToWatchlist(symbol.to_string()))
            .await
    }

    /// Remove a symbol from the watchlist.
    pub async fn remove_from_watchlist(&self, symbol: &str) -> ApiResult<Value> {
        self.send(&Endpoint::RemoveFromWatchlist(symbol.to_string()))
            .await
    }

    /// Submit a trade.
    pub async fn submit_trade(&self, request: TradeRequest) -> ApiResult<Value> {
        self.send(&Endpoint::Trade(request)).await
    }

    /// Issue a request and classify the outcome.
    ///
    /// Checks both the HTTP status and an `error` field in a 2xx body.
    pub async fn send(&self, endpoint: &Endpoint) -> ApiResult<Value> {
        let name = endpoint.name();

        if let Some(observer) = &self.observer {
            observer.on_event(&SemanticEvent::refresh(name));
        }
        Metrics::request(name);

        let url = format!("{}{}", self.base_url, endpoint.path());
        let mut request = self.client.request(endpoint.method(), &url);
        if let Some(symbol) = endpoint.symbol_query() {
            request = request.query(&[("symbol", symbol)]);
        }
        if let Some(body) = endpoint.body() {
            request = request.json(&body);
        }

        debug!(endpoint = name, method = %endpoint.method(), "Sending request");
        let started = Instant::now();

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read body: {e}")))?;

        Metrics::fetch_latency(name, started.elapsed().as_secs_f64() * 1000.0);

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| error_message(&body))
                .unwrap_or(text);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value =
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?;

        if let Some(message) = error_message(&body) {
            return Err(ApiError::Application(message));
        }

        Ok(body)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

fn record_failure(endpoint: &Endpoint, error: &ApiError) {
    warn!(
        endpoint = endpoint.name(),
        kind = error.kind(),
        error = %error,
        "Fetch failed, no update this cycle"
    );
    Metrics::fetch_failure(endpoint.name(), error.kind());
}

/// Extract an application error from a JSON body.
///
/// `{"error": null}` and `{"error": false}` are not errors.
fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_detection() {
        assert_eq!(
            error_message(&json!({"error": "Symbol not found"})),
            Some("Symbol not found".to_string())
        );
        assert_eq!(
            error_message(&json!({"error": {"code": 7}})),
            Some("{\"code\":7}".to_string())
        );
        assert_eq!(error_message(&json!({"error": null, "data": 1})), None);
        assert_eq!(error_message(&json!({"error": false})), None);
        assert_eq!(error_message(&json!([{"error": "nested"}])), None);
        assert_eq!(error_message(&json!({"stats": {}})), None);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://localhost:5000/".to_string(),
            timeout_ms: 1000,
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[tokio::test]
    async fn test_transport_failure_is_none() {
        // Bind then drop so the port is known to be closed.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let client = ApiClient::new(&ApiConfig {
            base_url: format!("http://{addr}"),
            timeout_ms: 500,
        })
        .unwrap();
        assert!(client.fetch(&Endpoint::Summary).await.is_none());
    }
}
