//! Typed projections of snapshot sections.
//!
//! The backend is an opaque JSON contract, so every field is optional and
//! unknown fields are ignored. Renderers decide how absence is displayed.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Products at or below this quantity are low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Dashboard headline numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    #[serde(default)]
    pub total_products: Option<u64>,
    #[serde(default, alias = "low_stock_count")]
    pub low_stock: Option<u64>,
    #[serde(default, alias = "revenue")]
    pub today_revenue: Option<f64>,
}

/// Price direction for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn color(&self) -> &'static str {
        match self {
            Self::Up => "green",
            Self::Down => "red",
        }
    }
}

/// A quote for an index, stock or coin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
}

impl MarketQuote {
    /// Name to show; falls back to the well-known index name, then the symbol.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => display_name(&self.symbol).to_string(),
        }
    }

    /// `abs(change_percent)`, if known.
    pub fn volatility(&self) -> Option<f64> {
        self.change_percent.map(f64::abs)
    }

    /// Zero change counts as up.
    pub fn direction(&self) -> Direction {
        let change = self.change.or(self.change_percent).unwrap_or(0.0);
        if change >= 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Watchlist rows share the quote shape.
pub type WatchlistEntry = MarketQuote;

/// Display name for well-known index symbols.
pub fn display_name(symbol: &str) -> &str {
    match symbol {
        "^GSPC" => "S&P 500",
        "^IXIC" => "Nasdaq",
        "^DJI" => "Dow Jones",
        "^FTSE" => "FTSE 100",
        "^NSEI" => "Nifty 50",
        "^N225" => "Nikkei 225",
        "^GDAXI" => "DAX",
        "BTC-USD" => "Bitcoin",
        other => other,
    }
}

/// A recorded sale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub quantity: Option<u64>,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub sold_by: Option<String>,
}

/// A catalog product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, alias = "_id", deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub supplier: Option<String>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.quantity
            .map(|q| q <= LOW_STOCK_THRESHOLD)
            .unwrap_or(false)
    }
}

/// A position held in the simulated portfolio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioHolding {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default, alias = "avg_cost")]
    pub avg_price: Option<Decimal>,
    #[serde(default)]
    pub current_price: Option<Decimal>,
}

impl PortfolioHolding {
    pub fn market_value(&self) -> Option<Decimal> {
        self.quantity?.checked_mul(self.current_price?)
    }

    pub fn unrealized_pnl(&self) -> Option<Decimal> {
        self.current_price?
            .checked_sub(self.avg_price?)?
            .checked_mul(self.quantity?)
    }

    /// The holding as a quote at its current price, for opening a trade.
    pub fn quote(&self) -> MarketQuote {
        MarketQuote {
            symbol: self.symbol.clone(),
            price: self.current_price,
            ..Default::default()
        }
    }
}

/// A news headline for a symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

/// Technical indicators for a symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub rsi: Option<f64>,
    #[serde(default)]
    pub sma_20: Option<f64>,
    #[serde(default)]
    pub sma_50: Option<f64>,
}

impl Indicators {
    /// RSI reading: above 70 overbought, below 30 oversold.
    pub fn rsi_signal(&self) -> &'static str {
        match self.rsi {
            Some(rsi) if rsi > 70.0 => "Overbought",
            Some(rsi) if rsi < 30.0 => "Oversold",
            Some(_) => "Neutral",
            None => "Unknown",
        }
    }
}

/// AI-generated text (market insight or inventory advice).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(default, alias = "insight", alias = "advice")]
    pub text: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
