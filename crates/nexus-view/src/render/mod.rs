//! Region renderers.
//!
//! Every renderer is a pure function of one snapshot section (plus, for
//! dropdowns, the surface's current selection). Missing or malformed input
//! renders a placeholder instead of failing. List rows carry a `data-key`
//! with their natural identifier.

pub mod dashboard;
pub mod inventory;
pub mod market;

pub use dashboard::{MarketWidgetRenderer, RecentSalesRenderer, StatsRenderer};
pub use inventory::{
    AdviceRenderer, LowStockRenderer, ProductSelectRenderer, ProductTableRenderer,
    SalesChartRenderer, SalesHistoryRenderer,
};
pub use market::{
    IndicatorsRenderer, InsightRenderer, NewsRenderer, PortfolioRenderer, QuoteDetailRenderer,
    QuoteGridRenderer, WatchlistRenderer,
};

use crate::format::escape_html;
use crate::surface::Surface;
use serde_json::Value;

/// Placeholder for an empty or missing table/list.
pub const NO_DATA: &str = "No data available";

/// Placeholder for the market widget when quotes could not be loaded.
pub const UNAVAILABLE: &str = "Unavailable";

/// Rendered content for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub region: &'static str,
    pub html: String,
}

impl Fragment {
    pub fn new(region: &'static str, html: impl Into<String>) -> Self {
        Self {
            region,
            html: html.into(),
        }
    }
}

/// Maps one snapshot section to the regions it owns.
pub trait Renderer: Send + Sync {
    /// Snapshot section this renderer reads.
    fn section(&self) -> &'static str;

    /// Regions this renderer writes, in output order.
    fn regions(&self) -> Vec<&'static str>;

    /// Render the section. Must return one fragment per region.
    fn render(&self, section: Option<&Value>, surface: &dyn Surface) -> Vec<Fragment>;

    /// Whether a snapshot without this section should still be rendered.
    ///
    /// By default the region keeps its last-known-good content.
    fn render_missing(&self) -> bool {
        false
    }
}

/// `<tr>` rows, or a single placeholder row spanning `columns`.
fn table_body(rows: &[String], columns: usize) -> String {
    if rows.is_empty() {
        return format!(
            "<tr class=\"empty\"><td colspan=\"{columns}\">{NO_DATA}</td></tr>"
        );
    }
    rows.concat()
}

/// `<td>` with escaped content.
fn cell(value: &str) -> String {
    format!("<td>{}</td>", escape_html(value))
}

fn placeholder(class: &str, text: &str) -> String {
    format!("<div class=\"{class}\">{text}</div>")
}
