//! Semantic events derived from snapshot deltas.

use crate::config::SyncConfig;
use nexus_core::{Insight, MarketQuote, Product, SemanticEvent, Snapshot, SummaryStats};
use nexus_view::model::rows;

/// Sections that carry market quotes.
const QUOTE_SECTIONS: [&str; 3] = ["market", "indices", "watchlist"];

/// Sections that carry AI text.
const INSIGHT_SECTIONS: [&str; 2] = ["insight", "advice"];

/// Turns successive snapshots of one pipeline into semantic events.
///
/// Remembers only what the previous successful cycle showed, so a skipped
/// cycle neither raises events nor disturbs the comparison.
#[derive(Debug, Clone)]
pub struct EventDeriver {
    volatility_threshold: f64,
    low_stock_threshold: i64,
    /// Quote sections that count towards `market_update`.
    quote_sections: Vec<&'static str>,
    last_revenue: Option<f64>,
    last_insight: Option<String>,
}

impl EventDeriver {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            volatility_threshold: config.volatility_threshold,
            low_stock_threshold: config.low_stock_threshold,
            quote_sections: QUOTE_SECTIONS.to_vec(),
            last_revenue: None,
            last_insight: None,
        }
    }

    /// Derive `market_update` only from the quote sections a pipeline renders.
    ///
    /// A combined payload may carry quotes owned by another pipeline; those
    /// must not raise events on this one's cadence.
    pub fn for_sections(config: &SyncConfig, rendered: &[&'static str]) -> Self {
        let mut deriver = Self::new(config);
        deriver
            .quote_sections
            .retain(|section| rendered.contains(section));
        deriver
    }

    /// Events for one successful cycle, in delivery order.
    pub fn derive(&mut self, snapshot: &Snapshot) -> Vec<SemanticEvent> {
        let mut events = Vec::new();
        let stats: Option<SummaryStats> = snapshot.section_as("stats");

        if let Some(count) = self.low_stock_count(snapshot, stats.as_ref()) {
            if count > 0 {
                events.push(SemanticEvent::low_stock(count));
            }
        }

        if let Some(revenue) = stats.as_ref().and_then(|s| s.today_revenue) {
            if let Some(previous) = self.last_revenue {
                if revenue > previous {
                    events.push(SemanticEvent::sale(revenue - previous));
                }
            }
            self.last_revenue = Some(revenue);
        }

        if let Some(volatility) = volatility_in(snapshot, &self.quote_sections) {
            events.push(SemanticEvent::market_update(
                volatility,
                self.volatility_threshold,
            ));
        }

        if let Some(text) = insight_text(snapshot) {
            if self.last_insight.as_deref() != Some(text.as_str()) {
                events.push(SemanticEvent::ai_insight(&text));
                self.last_insight = Some(text);
            }
        }

        events
    }

    /// Low-stock count from the summary, or counted from the product list.
    fn low_stock_count(&self, snapshot: &Snapshot, stats: Option<&SummaryStats>) -> Option<u64> {
        if let Some(count) = stats.and_then(|s| s.low_stock) {
            return Some(count);
        }
        let products: Vec<Product> = rows(snapshot.section("products"))?;
        let count = products
            .iter()
            .filter(|p| {
                p.quantity
                    .map(|q| q <= self.low_stock_threshold)
                    .unwrap_or(false)
            })
            .count();
        Some(count as u64)
    }
}

/// Largest `abs(change_percent)` across every quote in the snapshot.
pub fn max_volatility(snapshot: &Snapshot) -> Option<f64> {
    volatility_in(snapshot, &QUOTE_SECTIONS)
}

fn volatility_in(snapshot: &Snapshot, sections: &[&str]) -> Option<f64> {
    sections
        .iter()
        .filter_map(|name| rows::<MarketQuote>(snapshot.section(name)))
        .flatten()
        .filter_map(|quote| quote.volatility())
        .fold(None, |max: Option<f64>, v| Some(max.map_or(v, |m| m.max(v))))
}

fn insight_text(snapshot: &Snapshot) -> Option<String> {
    INSIGHT_SECTIONS
        .iter()
        .filter_map(|name| snapshot.section_as::<Insight>(name))
        .filter_map(|insight| insight.text)
        .find(|text| !text.trim().is_empty())
}
