//! Route classification.

use std::fmt;

/// Page kind, determined once from the current path at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// Core stats, recent sales, market headline.
    Dashboard,
    /// Product catalog.
    Products,
    /// Sales recording and recent transactions.
    Sales,
    /// Low-stock report and sales history.
    Reports,
    /// Market watchlist, portfolio and trading.
    Market,
    /// Login, suppliers and anything else: nothing to poll.
    Static,
}

impl Page {
    /// Classify a request path. Query strings and trailing slashes are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(&['?', '#'][..]).next().unwrap_or_default();
        let first = path
            .trim_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();

        match first {
            "" | "dashboard" => Self::Dashboard,
            "products" => Self::Products,
            "sales" => Self::Sales,
            "reports" => Self::Reports,
            "market" => Self::Market,
            _ => Self::Static,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Products => "products",
            Self::Sales => "sales",
            Self::Reports => "reports",
            Self::Market => "market",
            Self::Static => "static",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
