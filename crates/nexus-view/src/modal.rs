//! Trade confirmation modal.

use crate::format::{currency_decimal, escape_html};
use nexus_core::{MarketQuote, TradeIntent, TradeRequest, TradeSide};
use rust_decimal::Decimal;
use tracing::debug;

/// Region the modal renders into.
pub const TRADE_MODAL: &str = "trade-modal";

/// Holds at most one open [`TradeIntent`].
///
/// The price is captured from the quote when the modal opens; later quote
/// refreshes never change the total.
#[derive(Debug, Default)]
pub struct TradeModal {
    intent: Option<TradeIntent>,
}

impl TradeModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open for `quote`, replacing any intent already open.
    ///
    /// Returns `false` when the quote has no price to trade at.
    pub fn open(&mut self, quote: &MarketQuote, side: TradeSide) -> bool {
        let Some(price) = quote.price else {
            return false;
        };
        debug!(symbol = %quote.symbol, %price, %side, "Trade modal opened");
        self.intent = Some(TradeIntent::new(quote.symbol.clone(), price, side));
        true
    }

    pub fn is_open(&self) -> bool {
        self.intent.is_some()
    }

    pub fn intent(&self) -> Option<&TradeIntent> {
        self.intent.as_ref()
    }

    /// Update the quantity of the open intent.
    ///
    /// Returns `false`, keeping the previous quantity, when nothing is open or
    /// the total would not fit in a `Decimal`.
    pub fn set_quantity(&mut self, quantity: u32) -> bool {
        let Some(intent) = &mut self.intent else {
            return false;
        };
        let previous = intent.quantity;
        intent.set_quantity(quantity);
        if intent.total().is_none() {
            intent.set_quantity(previous);
            return false;
        }
        true
    }

    pub fn total(&self) -> Option<Decimal> {
        self.intent.as_ref().and_then(TradeIntent::total)
    }

    /// Total as shown in the modal, e.g. `450.00`.
    pub fn total_display(&self) -> Option<String> {
        self.total().map(|t| format!("{t:.2}"))
    }

    /// Take the intent for submission. A second call returns `None`.
    pub fn submit(&mut self) -> Option<TradeRequest> {
        self.intent.take().map(TradeIntent::into_request)
    }

    /// Close without submitting.
    pub fn cancel(&mut self) {
        self.intent = None;
    }

    /// Modal markup; empty when closed.
    pub fn render(&self) -> String {
        let Some(intent) = &self.intent else {
            return String::new();
        };
        format!(
            "<div class=\"modal trade {side}\" data-key=\"{symbol}\">\
             <h3>{title} {symbol}</h3>\
             <div class=\"price\">Price: {price}</div>\
             <input type=\"number\" name=\"quantity\" min=\"1\" value=\"{qty}\">\
             <div class=\"total\">Total: {total}</div></div>",
            side = intent.side,
            title = match intent.side {
                TradeSide::Buy => "Buy",
                TradeSide::Sell => "Sell",
            },
            symbol = escape_html(&intent.symbol),
            price = currency_decimal(intent.price),
            qty = intent.quantity,
            total = intent.total().map(currency_decimal).unwrap_or_default(),
        )
    }
}
