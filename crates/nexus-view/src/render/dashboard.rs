//! Dashboard regions: headline stats, market widget, recent sales.

use super::{cell, placeholder, table_body, Fragment, Renderer, UNAVAILABLE};
use crate::format::escape_html;
use crate::model::{record, rows, QuoteCard, SaleRow, StatsView};
use crate::surface::Surface;
use nexus_core::{MarketQuote, SaleRecord, SummaryStats};
use serde_json::Value;

pub const STAT_TOTAL_PRODUCTS: &str = "stat-total-products";
pub const STAT_LOW_STOCK: &str = "stat-low-stock";
pub const STAT_TODAY_REVENUE: &str = "stat-today-revenue";

/// Headline numbers. Each field is its own region so only the numbers that
/// moved get the "changed" highlight.
#[derive(Debug, Default)]
pub struct StatsRenderer;

impl Renderer for StatsRenderer {
    fn section(&self) -> &'static str {
        "stats"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![STAT_TOTAL_PRODUCTS, STAT_LOW_STOCK, STAT_TODAY_REVENUE]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let stats: Option<SummaryStats> = record(section);
        let view = StatsView::from_stats(stats.as_ref());
        vec![
            Fragment::new(STAT_TOTAL_PRODUCTS, view.total_products),
            Fragment::new(STAT_LOW_STOCK, view.low_stock),
            Fragment::new(STAT_TODAY_REVENUE, view.today_revenue),
        ]
    }
}

/// Compact ticker of headline quotes on the dashboard.
#[derive(Debug, Default)]
pub struct MarketWidgetRenderer;

pub const MARKET_WIDGET: &str = "market-widget";

impl Renderer for MarketWidgetRenderer {
    fn section(&self) -> &'static str {
        "market"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![MARKET_WIDGET]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let quotes: Vec<MarketQuote> = rows(section).unwrap_or_default();
        if quotes.is_empty() {
            return vec![Fragment::new(
                MARKET_WIDGET,
                placeholder("market-unavailable", UNAVAILABLE),
            )];
        }

        let items: String = quotes
            .iter()
            .map(QuoteCard::from)
            .map(|card| {
                format!(
                    "<div class=\"ticker-item\" data-key=\"{}\"><span class=\"ticker-name\">{}</span>\
                     <span class=\"ticker-price\">{}</span>\
                     <span class=\"ticker-change {}\">{}</span></div>",
                    escape_html(&card.key),
                    escape_html(&card.name),
                    card.price,
                    card.color,
                    card.percent,
                )
            })
            .collect();

        vec![Fragment::new(MARKET_WIDGET, items)]
    }

    /// Missing quotes show "Unavailable" rather than stale prices.
    fn render_missing(&self) -> bool {
        true
    }
}

/// Latest sales on the dashboard.
#[derive(Debug, Default)]
pub struct RecentSalesRenderer;

pub const RECENT_SALES: &str = "recent-sales";

impl Renderer for RecentSalesRenderer {
    fn section(&self) -> &'static str {
        "recent_sales"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![RECENT_SALES]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let sales: Vec<SaleRecord> = rows(section).unwrap_or_default();
        let body: Vec<String> = sales
            .iter()
            .map(SaleRow::from)
            .map(|row| {
                format!(
                    "<tr>{}{}{}{}</tr>",
                    cell(&row.product),
                    cell(&row.quantity),
                    cell(&row.total),
                    cell(&row.date)
                )
            })
            .collect();
        vec![Fragment::new(RECENT_SALES, table_body(&body, 4))]
    }
}
