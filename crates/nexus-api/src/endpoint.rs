//! The fixed set of backend endpoints.

use nexus_core::TradeRequest;
use reqwest::Method;
use serde_json::{json, Value};

/// A backend endpoint with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /api/summary`
    Summary,
    /// `GET /api/products`
    Products,
    /// `GET /api/sales`
    Sales,
    /// `GET /api/realtime-updates` (combined dashboard snapshot)
    RealtimeUpdates,
    /// `GET /api/market` (global indices)
    Market,
    /// `GET /api/market/watchlist`
    Watchlist,
    /// `GET /api/market/portfolio`
    Portfolio,
    /// `GET /api/market/search?symbol=`
    Search(String),
    /// `GET /api/market/indicators?symbol=`
    Indicators(String),
    /// `GET /api/market/news?symbol=`
    News(String),
    /// `POST /api/market/watchlist` with `{symbol}`
    AddToWatchlist(String),
    /// `DELETE /api/market/watchlist?symbol=`
    RemoveFromWatchlist(String),
    /// `POST /api/market/trade` with `{symbol, quantity, type}`
    Trade(TradeRequest),
    /// `GET /api/ai/market-insights`
    MarketInsights,
    /// `GET /api/ai/inventory-advice`
    InventoryAdvice,
}

impl Endpoint {
    /// Short name used in logs, metrics and `refresh` events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Products => "products",
            Self::Sales => "sales",
            Self::RealtimeUpdates => "realtime-updates",
            Self::Market => "market",
            Self::Watchlist => "watchlist",
            Self::Portfolio => "portfolio",
            Self::Search(_) => "search",
            Self::Indicators(_) => "indicators",
            Self::News(_) => "news",
            Self::AddToWatchlist(_) => "watchlist-add",
            Self::RemoveFromWatchlist(_) => "watchlist-remove",
            Self::Trade(_) => "trade",
            Self::MarketInsights => "market-insights",
            Self::InventoryAdvice => "inventory-advice",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::AddToWatchlist(_) | Self::Trade(_) => Method::POST,
            Self::RemoveFromWatchlist(_) => Method::DELETE,
            _ => Method::GET,
        }
    }

    /// Path relative to the API root.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Summary => "/api/summary",
            Self::Products => "/api/products",
            Self::Sales => "/api/sales",
            Self::RealtimeUpdates => "/api/realtime-updates",
            Self::Market => "/api/market",
            Self::Watchlist | Self::AddToWatchlist(_) | Self::RemoveFromWatchlist(_) => {
                "/api/market/watchlist"
            }
            Self::Portfolio => "/api/market/portfolio",
            Self::Search(_) => "/api/market/search",
            Self::Indicators(_) => "/api/market/indicators",
            Self::News(_) => "/api/market/news",
            Self::Trade(_) => "/api/market/trade",
            Self::MarketInsights => "/api/ai/market-insights",
            Self::InventoryAdvice => "/api/ai/inventory-advice",
        }
    }

    /// `symbol` query parameter, for the endpoints that take one.
    pub fn symbol_query(&self) -> Option<&str> {
        match self {
            Self::Search(symbol)
            | Self::Indicators(symbol)
            | Self::News(symbol)
            | Self::RemoveFromWatchlist(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// JSON request body, for POST endpoints.
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::AddToWatchlist(symbol) => Some(json!({ "symbol": symbol })),
            Self::Trade(request) => serde_json::to_value(request).ok(),
            _ => None,
        }
    }

    /// Whether this endpoint changes server state.
    pub fn is_mutation(&self) -> bool {
        self.method() != Method::GET
    }
}
