//! Yahoo response shapes and their conversion into TickerLens values.
//!
//! Everything here is pure (`&str` in, typed values out) so the parsers
//! are tested against captured payloads without a network.

mod chart;
mod fundamentals;
mod quote_summary;
mod search;

pub use chart::{chart_dividends, chart_quote, chart_series, parse_chart, ChartResult};
pub use fundamentals::{parse_statement, statement_types};
pub use quote_summary::parse_earnings;
pub use search::parse_news;

use serde::Deserialize;
use tickerlens_traits::ProviderError;

/// `{ "raw": 1.23, "fmt": "1.23" }` wrapper used across Yahoo payloads.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct RawValue {
    #[serde(default)]
    pub raw: Option<f64>,
}

/// Error object embedded in chart and quoteSummary envelopes.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

impl ApiError {
    pub(crate) fn into_provider_error(self, symbol: &str) -> ProviderError {
        match self.code.as_str() {
            "Not Found" => ProviderError::NotFound(format!("{symbol}: {}", self.description)),
            "Bad Request" => ProviderError::InvalidRequest(self.description),
            _ => ProviderError::unavailable("yahoo", format!("{}: {}", self.code, self.description)),
        }
    }
}

pub(crate) fn parse_json<'a, T: Deserialize<'a>>(body: &'a str, what: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::Parse(format!("yahoo {what}: {e}")))
}
