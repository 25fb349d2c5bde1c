//! Records returned by market-data providers besides price series.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{Date, StatementFrequency, Symbol};

/// Latest traded price of a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Quoted symbol.
    pub symbol: Symbol,
    /// Regular market price.
    pub price: f64,
    /// Quote currency, when the provider reports one.
    pub currency: Option<String>,
    /// Previous session close, when available.
    pub previous_close: Option<f64>,
    /// Unix timestamp (seconds) of the price.
    pub timestamp: Option<i64>,
}

impl Quote {
    /// Change versus the previous close as a fraction.
    pub fn change_fraction(&self) -> Option<f64> {
        let prev = self.previous_close?;
        (prev > 0.0).then(|| self.price / prev - 1.0)
    }
}

/// One cash dividend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    /// Ex-dividend date.
    pub date: Date,
    /// Amount per share.
    pub amount: f64,
}

/// Which statement a [`FinancialStatement`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Income statement.
    Income,
    /// Cash flow statement.
    Cashflow,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatementKind::Income => "income statement",
            StatementKind::Cashflow => "cash flow statement",
        })
    }
}

/// A dated value of one statement line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Fiscal period end date.
    pub as_of: Date,
    /// Reported value in the statement currency.
    pub value: f64,
}

/// Statement line items keyed by line name, each a dated history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatement {
    /// Reporting company.
    pub symbol: Symbol,
    /// Statement type.
    pub kind: StatementKind,
    /// Reporting frequency.
    pub frequency: StatementFrequency,
    /// Line name (e.g. `TotalRevenue`) to values ascending by date.
    pub line_items: BTreeMap<String, Vec<LineItem>>,
}

impl FinancialStatement {
    /// Most recent value of a line.
    pub fn latest(&self, line: &str) -> Option<LineItem> {
        self.line_items.get(line)?.last().copied()
    }

    /// Pivots into `date -> { line -> value }`, the column-per-period layout
    /// statement tables are usually read in.
    pub fn by_period(&self) -> BTreeMap<String, BTreeMap<String, f64>> {
        let mut out: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
        for (line, items) in &self.line_items {
            for item in items {
                out.entry(item.as_of.to_string())
                    .or_default()
                    .insert(line.clone(), item.value);
            }
        }
        out
    }
}

/// Scheduled or reported earnings announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsDate {
    /// Announcement (or quarter end) date.
    pub date: Date,
    /// Consensus EPS estimate.
    pub eps_estimate: Option<f64>,
    /// Reported EPS.
    pub eps_actual: Option<f64>,
    /// Surprise as a percentage of the estimate.
    pub surprise_pct: Option<f64>,
}

/// A news headline related to a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Headline.
    pub title: String,
    /// Publisher name.
    pub publisher: Option<String>,
    /// Article URL.
    pub link: Option<String>,
    /// Unix timestamp (seconds) of publication.
    pub published_at: Option<i64>,
    /// Other tickers the article is tagged with.
    #[serde(default)]
    pub related_tickers: Vec<String>,
}
