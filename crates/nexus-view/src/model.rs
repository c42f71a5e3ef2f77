//! Typed view-models: one display-ready record per row.
//!
//! Built from the records in `nexus_core`; every value is already a display
//! string so renderers only lay them out.

use crate::format::{currency, currency_decimal, signed_number, signed_percent};
use nexus_core::{
    Indicators, MarketQuote, NewsItem, PortfolioHolding, Product, SaleRecord, SummaryStats,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Shown for a scalar field the backend did not send.
pub const MISSING: &str = "--";

/// Rows of a list section.
///
/// An array yields its decodable elements (malformed rows are dropped), an
/// object yields itself as the single row, anything else is `None`.
pub fn rows<T: DeserializeOwned>(section: Option<&Value>) -> Option<Vec<T>> {
    match section? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
        ),
        obj @ Value::Object(_) => serde_json::from_value(obj.clone()).ok().map(|row| vec![row]),
        _ => None,
    }
}

/// Single-object section.
pub fn record<T: DeserializeOwned>(section: Option<&Value>) -> Option<T> {
    section.and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// Dashboard headline numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub total_products: String,
    pub low_stock: String,
    pub today_revenue: String,
}

impl StatsView {
    pub fn from_stats(stats: Option<&SummaryStats>) -> Self {
        let stats = stats.cloned().unwrap_or_default();
        Self {
            total_products: stats
                .total_products
                .map(|n| n.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            low_stock: stats
                .low_stock
                .map(|n| n.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            today_revenue: stats
                .today_revenue
                .map(currency)
                .unwrap_or_else(|| MISSING.to_string()),
        }
    }
}

/// Quote card, keyed by symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteCard {
    pub key: String,
    pub name: String,
    pub price: String,
    pub change: String,
    pub percent: String,
    pub color: &'static str,
}

impl From<&MarketQuote> for QuoteCard {
    fn from(quote: &MarketQuote) -> Self {
        Self {
            key: quote.symbol.clone(),
            name: quote.display_name(),
            price: quote
                .price
                .map(|p| format!("{:.2}", p))
                .unwrap_or_else(|| MISSING.to_string()),
            change: quote
                .change
                .map(signed_number)
                .unwrap_or_else(|| MISSING.to_string()),
            percent: quote
                .change_percent
                .map(signed_percent)
                .unwrap_or_else(|| MISSING.to_string()),
            color: quote.direction().color(),
        }
    }
}

/// Sale table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRow {
    pub product: String,
    pub quantity: String,
    pub total: String,
    pub date: String,
}

impl From<&SaleRecord> for SaleRow {
    fn from(sale: &SaleRecord) -> Self {
        Self {
            product: sale
                .product_name
                .clone()
                .unwrap_or_else(|| MISSING.to_string()),
            quantity: sale
                .quantity
                .map(|q| q.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            total: sale
                .total_price
                .map(currency)
                .unwrap_or_else(|| MISSING.to_string()),
            date: sale.date.clone().unwrap_or_else(|| MISSING.to_string()),
        }
    }
}

/// Product table row, keyed by product id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub key: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub quantity: String,
    pub supplier: String,
    pub low_stock: bool,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| MISSING.to_string());
        Self {
            key: text(&product.id),
            name: text(&product.name),
            category: text(&product.category),
            price: product
                .price
                .map(currency)
                .unwrap_or_else(|| MISSING.to_string()),
            quantity: product
                .quantity
                .map(|q| q.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            supplier: text(&product.supplier),
            low_stock: product.is_low_stock(),
        }
    }
}

/// Portfolio row, keyed by symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingRow {
    pub key: String,
    pub quantity: String,
    pub avg_price: String,
    pub current_price: String,
    pub value: String,
    pub pnl: String,
    pub pnl_color: &'static str,
}

impl From<&PortfolioHolding> for HoldingRow {
    fn from(holding: &PortfolioHolding) -> Self {
        let money = |v: Option<rust_decimal::Decimal>| {
            v.map(currency_decimal)
                .unwrap_or_else(|| MISSING.to_string())
        };
        let pnl = holding.unrealized_pnl();
        Self {
            key: holding.symbol.clone(),
            quantity: holding
                .quantity
                .map(|q| q.normalize().to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            avg_price: money(holding.avg_price),
            current_price: money(holding.current_price),
            value: money(holding.market_value()),
            pnl: money(pnl),
            pnl_color: match pnl {
                Some(p) if p.is_sign_negative() && !p.is_zero() => "red",
                _ => "green",
            },
        }
    }
}

/// News headline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRow {
    pub title: String,
    pub publisher: String,
    pub link: Option<String>,
    pub time: String,
}

impl From<&NewsItem> for NewsRow {
    fn from(item: &NewsItem) -> Self {
        Self {
            title: item.title.clone().unwrap_or_else(|| "Untitled".to_string()),
            publisher: item.publisher.clone().unwrap_or_default(),
            link: item.link.clone(),
            time: item.time.clone().unwrap_or_else(|| "Recently".to_string()),
        }
    }
}

/// Technical indicator panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorView {
    pub symbol: String,
    pub rsi: String,
    pub sma_20: String,
    pub sma_50: String,
    pub signal: &'static str,
}

impl From<&Indicators> for IndicatorView {
    fn from(ind: &Indicators) -> Self {
        let num = |v: Option<f64>| v.map(|x| format!("{x:.2}")).unwrap_or_else(|| MISSING.to_string());
        Self {
            symbol: ind.symbol.clone(),
            rsi: num(ind.rsi),
            sma_20: num(ind.sma_20),
            sma_50: num(ind.sma_50),
            signal: ind.rsi_signal(),
        }
    }
}
