//! User-initiated actions on the market page.

use crate::context::SyncContext;
use crate::pipeline::Pipeline;
use nexus_api::{ApiError, Endpoint};
use nexus_core::{
    validate_quantity, validate_symbol, MarketQuote, PortfolioHolding, Snapshot, TradeSide,
};
use nexus_view::modal::TRADE_MODAL;
use nexus_view::model::{record, rows};
use nexus_view::render::{IndicatorsRenderer, NewsRenderer, QuoteDetailRenderer};
use nexus_view::{RegionSlot, Renderer, TradeModal};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// What the page should show the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing to announce; the regions already reflect the result.
    Done,
    /// Success message from the server.
    Notice(String),
    /// Failure to show in an alert dialog.
    Alert(String),
}

impl ActionOutcome {
    pub fn is_alert(&self) -> bool {
        matches!(self, Self::Alert(_))
    }
}

#[derive(Default)]
struct ActionState {
    slots: HashMap<&'static str, RegionSlot>,
    modal: TradeModal,
    /// Last quote shown by a search; trades open against it.
    last_quote: Option<MarketQuote>,
}

/// Search, watchlist and trade actions.
///
/// Lives as long as the market page's engine. Mutations re-run the ticker
/// pipeline so watchlist and portfolio reflect the change.
pub struct MarketActions {
    ctx: Arc<SyncContext>,
    ticker: Arc<Pipeline>,
    state: Mutex<ActionState>,
}

impl MarketActions {
    pub fn new(ctx: Arc<SyncContext>, ticker: Arc<Pipeline>) -> Self {
        Self {
            ctx,
            ticker,
            state: Mutex::new(ActionState::default()),
        }
    }

    /// Look up a symbol and show its quote.
    pub async fn search(&self, symbol: &str) -> ActionOutcome {
        let symbol = match validate_symbol(symbol) {
            Ok(symbol) => symbol,
            Err(e) => return ActionOutcome::Alert(e.to_string()),
        };

        match self.ctx.api.send(&Endpoint::Search(symbol.clone())).await {
            Ok(body) => {
                let quote = record::<MarketQuote>(Some(&body)).filter(|q| !q.symbol.is_empty());
                self.render(&QuoteDetailRenderer, Some(&body));
                let found = quote.is_some();
                self.state.lock().last_quote = quote;
                if found {
                    ActionOutcome::Done
                } else {
                    ActionOutcome::Alert(format!("No quote found for {symbol}"))
                }
            }
            Err(e) => self.failed("search", &e),
        }
    }

    /// Show technical indicators for a symbol.
    pub async fn indicators(&self, symbol: &str) -> ActionOutcome {
        self.lookup(symbol, Endpoint::Indicators, &IndicatorsRenderer)
            .await
    }

    /// Show news headlines for a symbol.
    pub async fn news(&self, symbol: &str) -> ActionOutcome {
        self.lookup(symbol, Endpoint::News, &NewsRenderer).await
    }

    pub async fn add_to_watchlist(&self, symbol: &str) -> ActionOutcome {
        let symbol = match validate_symbol(symbol) {
            Ok(symbol) => symbol,
            Err(e) => return ActionOutcome::Alert(e.to_string()),
        };
        match self.ctx.api.add_to_watchlist(&symbol).await {
            Ok(body) => {
                info!(%symbol, "Added to watchlist");
                self.ticker.run_cycle().await;
                ActionOutcome::Notice(
                    server_message(&body).unwrap_or_else(|| format!("{symbol} added to watchlist")),
                )
            }
            Err(e) => self.failed("watchlist-add", &e),
        }
    }

    pub async fn remove_from_watchlist(&self, symbol: &str) -> ActionOutcome {
        let symbol = match validate_symbol(symbol) {
            Ok(symbol) => symbol,
            Err(e) => return ActionOutcome::Alert(e.to_string()),
        };
        match self.ctx.api.remove_from_watchlist(&symbol).await {
            Ok(_) => {
                info!(%symbol, "Removed from watchlist");
                self.ticker.run_cycle().await;
                ActionOutcome::Done
            }
            Err(e) => self.failed("watchlist-remove", &e),
        }
    }

    /// Open the trade modal for the last searched quote.
    pub fn open_trade(&self, side: TradeSide) -> ActionOutcome {
        let mut state = self.state.lock();
        let Some(quote) = state.last_quote.clone() else {
            return ActionOutcome::Alert("Search for a symbol first".to_string());
        };
        self.open_modal(&mut state, &quote, side)
    }

    /// Open the trade modal for a quote the caller already holds.
    pub fn open_trade_for(&self, quote: &MarketQuote, side: TradeSide) -> ActionOutcome {
        let mut state = self.state.lock();
        self.open_modal(&mut state, quote, side)
    }

    /// Open the trade modal for a symbol shown in the watchlist, indices or
    /// portfolio, at the price the ticker last rendered.
    pub fn open_trade_symbol(&self, symbol: &str, side: TradeSide) -> ActionOutcome {
        let symbol = match validate_symbol(symbol) {
            Ok(symbol) => symbol,
            Err(e) => return ActionOutcome::Alert(e.to_string()),
        };
        let quote = self
            .ticker
            .last_snapshot()
            .and_then(|snapshot| ticker_quote(&snapshot, &symbol));
        match quote {
            Some(quote) => self.open_trade_for(&quote, side),
            None => ActionOutcome::Alert(format!("{symbol} is not on the market page")),
        }
    }

    /// Change the quantity of the open trade; the total follows the captured price.
    pub fn set_trade_quantity(&self, quantity: i64) -> ActionOutcome {
        let quantity = match validate_quantity(quantity) {
            Ok(quantity) => quantity,
            Err(e) => return ActionOutcome::Alert(e.to_string()),
        };
        let mut state = self.state.lock();
        if !state.modal.is_open() {
            return ActionOutcome::Alert("No trade in progress".to_string());
        }
        if !state.modal.set_quantity(quantity) {
            return ActionOutcome::Alert(format!("Quantity too large: {quantity}"));
        }
        self.commit_modal(&mut state);
        ActionOutcome::Done
    }

    /// Total of the open trade as displayed, e.g. `450.00`.
    pub fn trade_total(&self) -> Option<String> {
        self.state.lock().modal.total_display()
    }

    /// Submit the open trade. The intent is consumed even if the server rejects it.
    pub async fn submit_trade(&self) -> ActionOutcome {
        let request = {
            let mut state = self.state.lock();
            let request = state.modal.submit();
            self.commit_modal(&mut state);
            request
        };
        let Some(request) = request else {
            return ActionOutcome::Alert("No trade in progress".to_string());
        };

        let symbol = request.symbol.clone();
        let side = request.side;
        let quantity = request.quantity;
        match self.ctx.api.submit_trade(request).await {
            Ok(body) => {
                info!(%symbol, %side, quantity, "Trade executed");
                self.ticker.run_cycle().await;
                ActionOutcome::Notice(
                    server_message(&body).unwrap_or_else(|| "Trade executed".to_string()),
                )
            }
            Err(e) => self.failed("trade", &e),
        }
    }

    pub fn cancel_trade(&self) {
        let mut state = self.state.lock();
        state.modal.cancel();
        self.commit_modal(&mut state);
    }

    async fn lookup<F>(&self, symbol: &str, endpoint: F, renderer: &dyn Renderer) -> ActionOutcome
    where
        F: FnOnce(String) -> Endpoint,
    {
        let symbol = match validate_symbol(symbol) {
            Ok(symbol) => symbol,
            Err(e) => return ActionOutcome::Alert(e.to_string()),
        };
        let endpoint = endpoint(symbol);
        match self.ctx.api.send(&endpoint).await {
            Ok(body) => {
                self.render(renderer, Some(&body));
                ActionOutcome::Done
            }
            Err(e) => self.failed(endpoint.name(), &e),
        }
    }

    fn render(&self, renderer: &dyn Renderer, section: Option<&Value>) {
        let mut state = self.state.lock();
        let mut surface = self.ctx.surface.lock();
        for fragment in renderer.render(section, &*surface) {
            state
                .slots
                .entry(fragment.region)
                .or_insert_with(|| RegionSlot::new(fragment.region))
                .commit(fragment.html, &mut *surface);
        }
    }

    fn open_modal(
        &self,
        state: &mut ActionState,
        quote: &MarketQuote,
        side: TradeSide,
    ) -> ActionOutcome {
        if !state.modal.open(quote, side) {
            return ActionOutcome::Alert(format!("No price available for {}", quote.symbol));
        }
        self.commit_modal(state);
        ActionOutcome::Done
    }

    fn commit_modal(&self, state: &mut ActionState) {
        let html = state.modal.render();
        let mut surface = self.ctx.surface.lock();
        state
            .slots
            .entry(TRADE_MODAL)
            .or_insert_with(|| RegionSlot::new(TRADE_MODAL))
            .commit(html, &mut *surface);
    }

    fn failed(&self, action: &str, error: &ApiError) -> ActionOutcome {
        warn!(action, kind = error.kind(), error = %error, "Market action failed");
        ActionOutcome::Alert(error.user_message())
    }
}

impl fmt::Debug for MarketActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MarketActions")
            .field("trade_open", &state.modal.is_open())
            .field(
                "last_quote",
                &state.last_quote.as_ref().map(|q| q.symbol.as_str()),
            )
            .finish()
    }
}

/// Quote for `symbol` from the ticker's watchlist, indices or portfolio rows.
fn ticker_quote(snapshot: &Snapshot, symbol: &str) -> Option<MarketQuote> {
    let is_symbol = |s: &str| s.eq_ignore_ascii_case(symbol);
    ["watchlist", "indices"]
        .iter()
        .filter_map(|name| rows::<MarketQuote>(snapshot.section(name)))
        .flatten()
        .find(|quote| is_symbol(&quote.symbol))
        .or_else(|| {
            rows::<PortfolioHolding>(snapshot.section("portfolio"))?
                .into_iter()
                .find(|holding| is_symbol(&holding.symbol))
                .map(|holding| holding.quote())
        })
}

fn server_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_server_message() {
        assert_eq!(
            server_message(&serde_json::json!({"message": "Bought 3 TSLA"})).as_deref(),
            Some("Bought 3 TSLA")
        );
        assert_eq!(server_message(&serde_json::json!({"message": ""})), None);
        assert_eq!(server_message(&serde_json::json!({"ok": true})), None);
    }

    #[test]
    fn test_ticker_quote_lookup() {
        let snapshot = Snapshot::from_sections([
            (
                "watchlist",
                Some(serde_json::json!([{"symbol": "AAPL", "price": 190.0}])),
            ),
            (
                "portfolio",
                Some(serde_json::json!([
                    {"symbol": "NVDA", "quantity": 4, "avg_price": 400, "current_price": 880.5}
                ])),
            ),
        ]);

        let quote = ticker_quote(&snapshot, "AAPL").unwrap();
        assert_eq!(quote.price, Some(dec!(190)));

        let holding = ticker_quote(&snapshot, "NVDA").unwrap();
        assert_eq!(holding.symbol, "NVDA");
        assert_eq!(holding.price, Some(dec!(880.5)));

        assert!(ticker_quote(&snapshot, "MSFT").is_none());
    }

    #[test]
    fn test_outcome_is_alert() {
        assert!(ActionOutcome::Alert("x".to_string()).is_alert());
        assert!(!ActionOutcome::Notice("x".to_string()).is_alert());
    }
}
