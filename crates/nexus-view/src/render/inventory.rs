//! Products, sales and reports regions.

use super::{cell, placeholder, table_body, Fragment, Renderer, NO_DATA};
use crate::format::{currency, escape_html};
use crate::model::{record, rows, ProductRow, SaleRow};
use crate::surface::Surface;
use chrono::{Duration, NaiveDate};
use nexus_core::{Insight, Product, SaleRecord};
use serde_json::Value;
use std::collections::BTreeMap;

pub const PRODUCT_TABLE: &str = "product-table";
pub const PRODUCT_SELECT: &str = "product-select";
pub const LOW_STOCK_REPORT: &str = "low-stock-report";
pub const SALES_HISTORY: &str = "sales-history";
pub const SALES_CHART: &str = "sales-chart";
pub const INVENTORY_ADVICE: &str = "inventory-advice";

/// Calendar days before the latest sale that the chart still covers.
const CHART_DAYS: i64 = 7;

/// Full product catalog. Low-stock rows are flagged.
#[derive(Debug, Default)]
pub struct ProductTableRenderer;

impl Renderer for ProductTableRenderer {
    fn section(&self) -> &'static str {
        "products"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![PRODUCT_TABLE]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let products: Vec<Product> = rows(section).unwrap_or_default();
        let body: Vec<String> = products.iter().map(ProductRow::from).map(product_row).collect();
        vec![Fragment::new(PRODUCT_TABLE, table_body(&body, 5))]
    }
}

fn product_row(row: ProductRow) -> String {
    let class = if row.low_stock { " class=\"low-stock\"" } else { "" };
    format!(
        "<tr data-key=\"{}\"{class}>{}{}{}{}{}</tr>",
        escape_html(&row.key),
        cell(&row.name),
        cell(&row.category),
        cell(&row.price),
        cell(&row.quantity),
        cell(&row.supplier),
    )
}

/// Product dropdown on the sales form.
///
/// The option the user had selected stays selected as long as it is still in
/// the new option set.
#[derive(Debug, Default)]
pub struct ProductSelectRenderer;

impl Renderer for ProductSelectRenderer {
    fn section(&self) -> &'static str {
        "products"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![PRODUCT_SELECT]
    }

    fn render(&self, section: Option<&Value>, surface: &dyn Surface) -> Vec<Fragment> {
        let selected = surface.selected_value(PRODUCT_SELECT);
        let products: Vec<Product> = rows(section).unwrap_or_default();

        let mut html = String::from("<option value=\"\">Select a product</option>");
        for product in &products {
            let Some(id) = product.id.as_deref() else {
                continue;
            };
            let mark = if selected.as_deref() == Some(id) {
                " selected"
            } else {
                ""
            };
            html.push_str(&format!(
                "<option value=\"{}\" data-price=\"{}\"{mark}>{} ({} in stock)</option>",
                escape_html(id),
                product.price.unwrap_or(0.0),
                escape_html(product.name.as_deref().unwrap_or(id)),
                product.quantity.unwrap_or(0),
            ));
        }
        vec![Fragment::new(PRODUCT_SELECT, html)]
    }
}

/// Products at or below the low-stock threshold.
#[derive(Debug, Default)]
pub struct LowStockRenderer;

impl Renderer for LowStockRenderer {
    fn section(&self) -> &'static str {
        "products"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![LOW_STOCK_REPORT]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let products: Vec<Product> = rows(section).unwrap_or_default();
        let body: Vec<String> = products
            .iter()
            .filter(|p| p.is_low_stock())
            .map(ProductRow::from)
            .map(|row| {
                format!(
                    "<tr data-key=\"{}\">{}{}{}</tr>",
                    escape_html(&row.key),
                    cell(&row.name),
                    cell(&row.quantity),
                    cell(&row.supplier),
                )
            })
            .collect();
        vec![Fragment::new(LOW_STOCK_REPORT, table_body(&body, 3))]
    }
}

/// Sales history table, in backend order.
#[derive(Debug, Default)]
pub struct SalesHistoryRenderer;

impl Renderer for SalesHistoryRenderer {
    fn section(&self) -> &'static str {
        "sales"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![SALES_HISTORY]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let sales: Vec<SaleRecord> = rows(section).unwrap_or_default();
        let body: Vec<String> = sales
            .iter()
            .map(|sale| {
                let row = SaleRow::from(sale);
                format!(
                    "<tr>{}{}{}{}{}</tr>",
                    cell(&row.date),
                    cell(&row.product),
                    cell(&row.quantity),
                    cell(&row.total),
                    cell(sale.sold_by.as_deref().unwrap_or("")),
                )
            })
            .collect();
        vec![Fragment::new(SALES_HISTORY, table_body(&body, 5))]
    }
}

/// Daily revenue series for the chart, most recent days last.
#[derive(Debug, Default)]
pub struct SalesChartRenderer;

impl SalesChartRenderer {
    /// Revenue per `YYYY-MM-DD` from the latest sale day back `CHART_DAYS`
    /// calendar days. Days without sales are not listed.
    pub fn daily_totals(sales: &[SaleRecord]) -> Vec<(String, f64)> {
        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for sale in sales {
            let (Some(date), Some(total)) = (sale.date.as_deref(), sale.total_price) else {
                continue;
            };
            // Timestamps come as "YYYY-MM-DD", "YYYY-MM-DD HH:MM:SS" or ISO 8601.
            let Some(day) = date
                .get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            else {
                continue;
            };
            *totals.entry(day).or_default() += total;
        }
        let Some(latest) = totals.keys().next_back().copied() else {
            return Vec::new();
        };
        let since = latest - Duration::days(CHART_DAYS);
        totals
            .range(since..)
            .map(|(day, total)| (day.to_string(), *total))
            .collect()
    }
}

impl Renderer for SalesChartRenderer {
    fn section(&self) -> &'static str {
        "sales"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![SALES_CHART]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let sales: Vec<SaleRecord> = rows(section).unwrap_or_default();
        let series = Self::daily_totals(&sales);
        if series.is_empty() {
            return vec![Fragment::new(SALES_CHART, placeholder("chart-empty", NO_DATA))];
        }

        let bars: String = series
            .iter()
            .map(|(day, total)| {
                format!(
                    "<div class=\"bar\" data-key=\"{day}\" data-value=\"{total:.2}\">\
                     <span class=\"label\">{day}</span><span class=\"value\">{}</span></div>",
                    currency(*total)
                )
            })
            .collect();
        vec![Fragment::new(SALES_CHART, bars)]
    }
}

/// AI restocking advice.
#[derive(Debug, Default)]
pub struct AdviceRenderer;

impl Renderer for AdviceRenderer {
    fn section(&self) -> &'static str {
        "advice"
    }

    fn regions(&self) -> Vec<&'static str> {
        vec![INVENTORY_ADVICE]
    }

    fn render(&self, section: Option<&Value>, _surface: &dyn Surface) -> Vec<Fragment> {
        let text = record::<Insight>(section).and_then(|i| i.text);
        let html = match text {
            Some(text) if !text.trim().is_empty() => {
                format!("<p class=\"advice\">{}</p>", escape_html(&text))
            }
            _ => placeholder("advice-empty", NO_DATA),
        };
        vec![Fragment::new(INVENTORY_ADVICE, html)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use serde_json::json;

    fn products() -> Value {
        json!([
            {"_id": "p1", "name": "Bolt", "category": "Hardware", "price": 0.5, "quantity": 120, "supplier": "Acme"},
            {"_id": "p2", "name": "Nut", "category": "Hardware", "price": 0.25, "quantity": 4, "supplier": "Acme"},
            {"_id": "p3", "name": "Drill", "category": "Tools", "price": 89.99, "quantity": 5}
        ])
    }

    #[test]
    fn test_product_table_flags_low_stock() {
        let surface = MemorySurface::new();
        let html = &ProductTableRenderer.render(Some(&products()), &surface)[0].html;
        assert!(html.contains("<tr data-key=\"p1\"><td>Bolt</td>"));
        assert!(html.contains("<tr data-key=\"p2\" class=\"low-stock\">"));
        assert!(html.contains("<tr data-key=\"p3\" class=\"low-stock\">"));
        assert!(html.contains("<td>$89.99</td>"));
    }

    #[test]
    fn test_product_table_missing_section() {
        let surface = MemorySurface::new();
        let html = &ProductTableRenderer.render(None, &surface)[0].html;
        assert!(html.contains(NO_DATA));
    }

    #[test]
    fn test_select_preserves_selection() {
        let mut surface = MemorySurface::new();
        surface.select(PRODUCT_SELECT, "p2");

        let html = &ProductSelectRenderer.render(Some(&products()), &surface)[0].html;
        assert!(html.contains("<option value=\"p2\" data-price=\"0.25\" selected>Nut (4 in stock)</option>"));
        assert_eq!(html.matches(" selected").count(), 1);
    }

    #[test]
    fn test_select_drops_vanished_selection() {
        let mut surface = MemorySurface::new();
        surface.select(PRODUCT_SELECT, "gone");

        let html = &ProductSelectRenderer.render(Some(&products()), &surface)[0].html;
        assert!(!html.contains(" selected"));
        assert!(html.starts_with("<option value=\"\">Select a product</option>"));
    }

    #[test]
    fn test_low_stock_report() {
        let surface = MemorySurface::new();
        let html = &LowStockRenderer.render(Some(&products()), &surface)[0].html;
        assert!(!html.contains("Bolt"));
        assert!(html.contains("data-key=\"p2\""));
        assert!(html.contains("data-key=\"p3\""));

        let healthy = json!([{"_id": "p1", "quantity": 50}]);
        let html = &LowStockRenderer.render(Some(&healthy), &surface)[0].html;
        assert!(html.contains(NO_DATA));
    }

    #[test]
    fn test_daily_totals_window() {
        let sales: Vec<SaleRecord> = (1..=9)
            .map(|day| SaleRecord {
                date: Some(format!("2024-03-{day:02} 12:00:00")),
                total_price: Some(10.0 * day as f64),
                ..Default::default()
            })
            .chain([
                SaleRecord {
                    date: Some("2024-03-09T18:30:00".to_string()),
                    total_price: Some(5.0),
                    ..Default::default()
                },
                SaleRecord {
                    date: Some("yesterday".to_string()),
                    total_price: Some(1000.0),
                    ..Default::default()
                },
            ])
            .collect();

        let series = SalesChartRenderer::daily_totals(&sales);
        assert_eq!(series.len(), 8);
        assert_eq!(series[0].0, "2024-03-02");
        assert_eq!(series.last().unwrap(), &("2024-03-09".to_string(), 95.0));
    }

    #[test]
    fn test_daily_totals_calendar_window_with_gaps() {
        let sale = |date: &str, total: f64| SaleRecord {
            date: Some(date.to_string()),
            total_price: Some(total),
            ..Default::default()
        };
        let sales = [
            sale("2024-02-01", 500.0),
            sale("2024-03-10", 20.0),
            sale("2024-03-17", 10.0),
            sale("2024-03-24", 30.0),
        ];

        let series = SalesChartRenderer::daily_totals(&sales);
        assert_eq!(
            series,
            vec![
                ("2024-03-17".to_string(), 10.0),
                ("2024-03-24".to_string(), 30.0)
            ]
        );
        assert!(SalesChartRenderer::daily_totals(&[]).is_empty());
    }

    #[test]
    fn test_sales_chart_empty() {
        let surface = MemorySurface::new();
        let html = &SalesChartRenderer.render(Some(&json!([])), &surface)[0].html;
        assert!(html.contains(NO_DATA));
    }

    #[test]
    fn test_advice_aliases() {
        let surface = MemorySurface::new();
        let html = &AdviceRenderer.render(Some(&json!({"advice": "Restock <Nut>"})), &surface)[0].html;
        assert_eq!(html, "<p class=\"advice\">Restock &lt;Nut&gt;</p>");

        let html = &AdviceRenderer.render(Some(&json!({})), &surface)[0].html;
        assert!(html.contains(NO_DATA));
    }
}
