//! Trade intent captured by the market page.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Transient state captured when the trade modal opens.
///
/// The price is captured once and never re-fetched: quantity edits recompute
/// the total from it. Submitting consumes the intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeIntent {
    pub symbol: String,
    pub price: Decimal,
    pub quantity: u32,
    pub side: TradeSide,
}

impl TradeIntent {
    /// New intent with quantity 1.
    pub fn new(symbol: impl Into<String>, price: Decimal, side: TradeSide) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity: 1,
            side,
        }
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// Captured price times quantity, rounded to cents. `None` on overflow.
    pub fn total(&self) -> Option<Decimal> {
        self.price
            .checked_mul(Decimal::from(self.quantity))
            .map(|total| total.round_dp(2))
    }

    /// Consume the intent into the request body for `POST /api/market/trade`.
    pub fn into_request(self) -> TradeRequest {
        TradeRequest {
            symbol: self.symbol,
            quantity: self.quantity,
            side: self.side,
        }
    }
}

/// Body of `POST /api/market/trade`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub symbol: String,
    pub quantity: u32,
    #[serde(rename = "type")]
    pub side: TradeSide,
}
