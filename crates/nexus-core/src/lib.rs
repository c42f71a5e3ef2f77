//! Core data model for the Nexus inventory/market client.
//!
//! This crate provides the types shared by every other crate:
//! - `Snapshot`: one JSON payload returned by a poll cycle
//! - `SemanticEvent`, `EventSink`: business-meaningful notifications and their consumer
//! - `Page`: route classification used to pick which pipelines run
//! - `TradeIntent`: transient trade state captured by the market page
//! - Typed records projected out of snapshot sections

pub mod error;
pub mod event;
pub mod records;
pub mod route;
pub mod snapshot;
pub mod trade;
pub mod validate;

pub use error::{ValidationError, ValidationResult};
pub use event::{EventKind, EventSink, FlowIntensity, SemanticEvent, VOLATILITY_THRESHOLD};
pub use records::{
    display_name, Direction, Indicators, Insight, MarketQuote, NewsItem, PortfolioHolding,
    Product, SaleRecord, SummaryStats, WatchlistEntry, LOW_STOCK_THRESHOLD,
};
pub use route::Page;
pub use snapshot::Snapshot;
pub use trade::{TradeIntent, TradeRequest, TradeSide};
pub use validate::{validate_quantity, validate_symbol};
