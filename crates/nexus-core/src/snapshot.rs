//! Poll-cycle snapshots.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// One JSON payload returned by a poll cycle.
///
/// Snapshots are never merged: each one supersedes the previous entirely.
/// A non-object payload (e.g. a bare array from `/api/products`) is stored
/// under the section name it was fetched for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    sections: Map<String, Value>,
}

impl Snapshot {
    /// Wrap an object payload; its top-level keys become sections.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(sections) => Self { sections },
            other => {
                let mut sections = Map::new();
                sections.insert("data".to_string(), other);
                Self { sections }
            }
        }
    }

    /// Build a snapshot from `(section, payload)` pairs, skipping absent payloads.
    pub fn from_sections<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Option<Value>)>,
    {
        let sections = parts
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
            .collect();
        Self { sections }
    }

    /// Raw section, if present.
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.sections.get(name)
    }

    /// Typed section; `None` when absent or of the wrong shape.
    pub fn section_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.section(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::SummaryStats;
    use serde_json::json;

    #[test]
    fn test_object_payload_sections() {
        let snapshot = Snapshot::from_value(json!({
            "stats": {"total_products": 4, "low_stock": 1, "today_revenue": 99.5},
            "market": []
        }));
        assert!(snapshot.has_section("stats"));
        assert!(snapshot.has_section("market"));

        let stats: SummaryStats = snapshot.section_as("stats").unwrap();
        assert_eq!(stats.total_products, Some(4));
    }

    #[test]
    fn test_non_object_payload() {
        let snapshot = Snapshot::from_value(json!([1, 2, 3]));
        assert_eq!(snapshot.section("data"), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn test_from_sections_skips_missing() {
        let snapshot = Snapshot::from_sections([
            ("indices", Some(json!([]))),
            ("watchlist", None),
        ]);
        assert!(snapshot.has_section("indices"));
        assert!(!snapshot.has_section("watchlist"));
    }
}
