//! Market page regions.

use super::{cell, placeholder, table_body, Fragment, Renderer, NO_DATA};
use crate::format::escape_html;
use crate::model::{record, rows, HoldingRow, IndicatorView, NewsRow, QuoteCard};
use crate::surface::Surface;
use nexus_core::{Indicators, Insight, MarketQuote, NewsItem, PortfolioHolding};
use serde_json::Value;

pub const MARKET_INDICES: &str = "market-indices";
pub const WATCHLIST: &str = "watchlist";
pub const PORTFOLIO: &str = "portfolio";
pub const SEARCH_RESULT: &str = "search-result";
pub const INDICATORS: &str = "indicators";
pub const NEWS_FEED: &str = "news-feed";
pub const AI_INSIGHT: &str = "ai-insight";

fn quote_card(card: &QuoteCard, extra: &str) -> String {
    format!(
        "<div class=\"quote-card\" data-key=\"{key}\">\
         <div class=\"quote-name\">{name}</div>\
         <div class=\"quote-price\">{price}</div>\
         <div class=\"quote-change {color}\">{change} ({percent})</div>{extra}</div>",
        key = escape_html(&card.key),
        name = escape_html(&card.name),
        price = card.price,
        color = card.color,
        change = card.change,
        percent = card.percent,
    )
}

/// Grid of index quotes.
#[derive(Debug)]
pub struct QuoteGridRenderer {
    section: &'static str,
    region: &'static str,
}

impl QuoteGridRenderer {
    pub fn new(section: &'static str, region: &'static str) -> Self {
        Self { section, region }
    }

    /// Global indices on the market page.
    pub fn indices() -> Self {
        Self::new("indices", MARKET_INDICES)
    }
}

impl Renderer for QuoteGridRenderer {
    fn section(&self) -> &'static str {
        self.section
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![self.region]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let quotes: Vec<MarketQuote> = rows(section).unwrap_or_default();
        if quotes.is_empty() {
            return vec![Fragment::new(self.region, placeholder("grid-empty", NO_DATA))];
        }
        let html: String = quotes
            .iter()
            .map(|q| quote_card(&QuoteCard::from(q), ""))
            .collect();
        vec![Fragment::new(self.region, html)]
    }
}

/// User's watchlist, each row removable.
#[derive(Debug, Default)]
pub struct WatchlistRenderer;

impl Renderer for WatchlistRenderer {
    fn section(&self) -> &'static str {
        "watchlist"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![WATCHLIST]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let entries: Vec<MarketQuote> = rows(section).unwrap_or_default();
        let body: Vec<String> = entries
            .iter()
            .map(QuoteCard::from)
            .map(|card| {
                let key = escape_html(&card.key);
                format!(
                    "<tr data-key=\"{key}\">{}{}<td class=\"{}\">{}</td>\
                     <td><button class=\"remove\" data-symbol=\"{key}\">Remove</button></td></tr>",
                    cell(&card.key),
                    cell(&card.price),
                    card.color,
                    card.percent,
                )
            })
            .collect();
        vec![Fragment::new(WATCHLIST, table_body(&body, 4))]
    }
}

/// Simulated portfolio positions.
#[derive(Debug, Default)]
pub struct PortfolioRenderer;

impl Renderer for PortfolioRenderer {
    fn section(&self) -> &'static str {
        "portfolio"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![PORTFOLIO]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let holdings: Vec<PortfolioHolding> = rows(section).unwrap_or_default();
        let body: Vec<String> = holdings
            .iter()
            .map(HoldingRow::from)
            .map(|row| {
                format!(
                    "<tr data-key=\"{}\">{}{}{}{}{}<td class=\"{}\">{}</td></tr>",
                    escape_html(&row.key),
                    cell(&row.key),
                    cell(&row.quantity),
                    cell(&row.avg_price),
                    cell(&row.current_price),
                    cell(&row.value),
                    row.pnl_color,
                    escape_html(&row.pnl),
                )
            })
            .collect();
        vec![Fragment::new(PORTFOLIO, table_body(&body, 6))]
    }
}

/// Single quote from a symbol search, with trade buttons.
#[derive(Debug, Default)]
pub struct QuoteDetailRenderer;

impl Renderer for QuoteDetailRenderer {
    fn section(&self) -> &'static str {
        "search"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![SEARCH_RESULT]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let quote = record::<MarketQuote>(section).filter(|q| !q.symbol.is_empty());
        let html = match quote {
            Some(quote) => {
                let card = QuoteCard::from(&quote);
                let key = escape_html(&card.key);
                let buttons = format!(
                    "<div class=\"actions\">\
                     <button class=\"trade buy\" data-symbol=\"{key}\">Buy</button>\
                     <button class=\"trade sell\" data-symbol=\"{key}\">Sell</button>\
                     <button class=\"watch\" data-symbol=\"{key}\">Watch</button></div>"
                );
                quote_card(&card, &buttons)
            }
            None => placeholder("search-empty", NO_DATA),
        };
        vec![Fragment::new(SEARCH_RESULT, html)]
    }
}

/// RSI and moving averages for the searched symbol.
#[derive(Debug, Default)]
pub struct IndicatorsRenderer;

impl Renderer for IndicatorsRenderer {
    fn section(&self) -> &'static str {
        "indicators"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![INDICATORS]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let html = match record::<Indicators>(section) {
            Some(ind) => {
                let view = IndicatorView::from(&ind);
                format!(
                    "<div class=\"indicators\" data-key=\"{}\">\
                     <div>RSI (14): {} <span class=\"signal\">{}</span></div>\
                     <div>SMA 20: {}</div><div>SMA 50: {}</div></div>",
                    escape_html(&view.symbol),
                    view.rsi,
                    view.signal,
                    view.sma_20,
                    view.sma_50,
                )
            }
            None => placeholder("indicators-empty", NO_DATA),
        };
        vec![Fragment::new(INDICATORS, html)]
    }
}

/// Headlines for the searched symbol.
#[derive(Debug, Default)]
pub struct NewsRenderer;

impl Renderer for NewsRenderer {
    fn section(&self) -> &'static str {
        "news"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![NEWS_FEED]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let items: Vec<NewsItem> = rows(section).unwrap_or_default();
        if items.is_empty() {
            return vec![Fragment::new(NEWS_FEED, placeholder("news-empty", NO_DATA))];
        }
        let html: String = items
            .iter()
            .map(NewsRow::from)
            .map(|row| {
                let title = escape_html(&row.title);
                let headline = match &row.link {
                    Some(link) => format!(
                        "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{title}</a>",
                        escape_html(link)
                    ),
                    None => title,
                };
                format!(
                    "<div class=\"news-item\">{headline}\
                     <div class=\"meta\">{} &middot; {}</div></div>",
                    escape_html(&row.publisher),
                    escape_html(&row.time),
                )
            })
            .collect();
        vec![Fragment::new(NEWS_FEED, html)]
    }
}

/// AI market commentary.
#[derive(Debug, Default)]
pub struct InsightRenderer;

impl Renderer for InsightRenderer {
    fn section(&self) -> &'static str {
        "insight"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![AI_INSIGHT]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let html = match record::<Insight>(section).and_then(|i| i.text) {
            Some(text) if !text.trim().is_empty() => {
                format!("<p class=\"insight\">{}</p>", escape_html(&text))
            }
            _ => placeholder("insight-empty", NO_DATA),
        };
        vec![Fragment::new(AI_INSIGHT, html)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use serde_json::json;

    #[test]
    fn test_quote_grid_keys_and_names() {
        let surface = MemorySurface::new();
        let section = json!([
            {"symbol": "^IXIC", "price": 16000.0, "change": 80.0, "change_percent": 0.5},
            {"symbol": "^N225", "price": 39000.0, "change": -400.0, "change_percent": -1.02}
        ]);
        let html = &QuoteGridRenderer::indices().render(Some(&section), &surface)[0].html;
        assert!(html.contains("data-key=\"^IXIC\""));
        assert!(html.contains("Nasdaq"));
        assert!(html.contains("Nikkei 225"));
        assert!(html.contains("quote-change red\">-400.00 (-1.02%)"));
    }

    #[test]
    fn test_watchlist_rows() {
        let surface = MemorySurface::new();
        let section = json!([{"symbol": "AAPL", "price": 190.1, "change_percent": 1.1}]);
        let html = &WatchlistRenderer.render(Some(&section), &surface)[0].html;
        assert!(html.starts_with("<tr data-key=\"AAPL\">"));
        assert!(html.contains("data-symbol=\"AAPL\""));
        assert!(html.contains("<td class=\"green\">+1.10%</td>"));

        let html = &WatchlistRenderer.render(None, &surface)[0].html;
        assert!(html.contains(NO_DATA));
    }

    #[test]
    fn test_portfolio_rows() {
        let surface = MemorySurface::new();
        let section = json!([
            {"symbol": "MSFT", "quantity": 3, "avg_price": "400.00", "current_price": "410.50"}
        ]);
        let html = &PortfolioRenderer.render(Some(&section), &surface)[0].html;
        assert!(html.contains("data-key=\"MSFT\""));
        assert!(html.contains("<td>$1,231.50</td>"));
        assert!(html.contains("<td class=\"green\">$31.50</td>"));
    }

    #[test]
    fn test_search_result_with_actions() {
        let surface = MemorySurface::new();
        let section = json!({"symbol": "TSLA", "name": "Tesla", "price": 150, "change": 2.0, "change_percent": 1.35});
        let html = &QuoteDetailRenderer.render(Some(&section), &surface)[0].html;
        assert!(html.contains("Tesla"));
        assert!(html.contains("class=\"trade buy\" data-symbol=\"TSLA\""));

        let html = &QuoteDetailRenderer.render(Some(&json!({})), &surface)[0].html;
        assert!(html.contains(NO_DATA));
    }

    #[test]
    fn test_indicators_panel() {
        let surface = MemorySurface::new();
        let section = json!({"symbol": "AAPL", "rsi": 75.3, "sma_20": 180.0});
        let html = &IndicatorsRenderer.render(Some(&section), &surface)[0].html;
        assert!(html.contains("RSI (14): 75.30"));
        assert!(html.contains("Overbought"));
        assert!(html.contains("SMA 50: --"));
    }

    #[test]
    fn test_news_escapes_and_links() {
        let surface = MemorySurface::new();
        let section = json!([
            {"title": "Q1 <beats>", "publisher": "Wire", "link": "https://example.com/a?b=1&c=2"},
            {"publisher": "Desk"}
        ]);
        let html = &NewsRenderer.render(Some(&section), &surface)[0].html;
        assert!(html.contains("Q1 &lt;beats&gt;"));
        assert!(html.contains("href=\"https://example.com/a?b=1&amp;c=2\""));
        assert!(html.contains("Untitled"));
        assert!(html.contains("Recently"));
    }

    #[test]
    fn test_insight_text() {
        let surface = MemorySurface::new();
        let html = &InsightRenderer.render(Some(&json!({"insight": "Tech leads."})), &surface)[0].html;
        assert_eq!(html, "<p class=\"insight\">Tech leads.</p>");
    }
}
