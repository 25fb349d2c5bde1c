//! Tool parameter types.
//!
//! Symbols and dates arrive as strings and are validated inside the tool so
//! a bad value surfaces as an `invalid_input` error rather than a schema
//! rejection. Every default lives here, in the argument schema.

use rmcp::schemars::JsonSchema;
use serde::Deserialize;

use tickerlens_core::{Date, Interval, Period, StatementFrequency, Symbol};
use tickerlens_metrics::CorrelationBasis;
use tickerlens_traits::{HistoryRange, HistoryRequest};

use crate::error::{ToolError, ToolResult};

fn default_earnings_limit() -> usize {
    12
}

fn default_indices() -> String {
    "^GSPC,^DJI,^IXIC".to_string()
}

fn default_report_symbols() -> String {
    "AAPL,MSFT,GOOGL,AMZN,NVDA".to_string()
}

fn default_technical_symbol() -> String {
    "TSLA".to_string()
}

fn default_market_symbol() -> String {
    "^GSPC".to_string()
}

fn default_holdings() -> String {
    "AAPL:0.6,MSFT:0.4".to_string()
}

fn six_months() -> Period {
    Period::SixMonths
}

fn one_year() -> Period {
    Period::OneYear
}

fn default_ma_length() -> usize {
    20
}

fn default_rsi_length() -> usize {
    tickerlens_metrics::DEFAULT_RSI_WINDOW
}

fn default_macd_fast() -> usize {
    tickerlens_metrics::DEFAULT_MACD_FAST
}

fn default_macd_slow() -> usize {
    tickerlens_metrics::DEFAULT_MACD_SLOW
}

fn default_macd_signal() -> usize {
    tickerlens_metrics::DEFAULT_MACD_SIGNAL
}

fn default_confidence() -> f64 {
    tickerlens_metrics::DEFAULT_VAR_CONFIDENCE
}

/// Parses a required symbol argument.
pub(crate) fn parse_symbol(raw: &str) -> ToolResult<Symbol> {
    Ok(Symbol::parse(raw)?)
}

/// Parses a comma-separated, non-empty symbol list.
pub(crate) fn parse_symbols(raw: &str) -> ToolResult<Vec<Symbol>> {
    let symbols = Symbol::parse_list(raw)?;
    if symbols.is_empty() {
        return Err(ToolError::invalid("at least one symbol is required"));
    }
    Ok(symbols)
}

/// Parses a `YYYY-MM-DD` argument, naming the field on failure.
pub(crate) fn parse_date(field: &str, raw: &str) -> ToolResult<Date> {
    Date::parse(raw).map_err(|e| ToolError::invalid(format!("{field}: {e}")))
}

// ============================================================================
// Market data
// ============================================================================

/// A single ticker symbol.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SymbolParams {
    /// Ticker symbol (e.g., "AAPL", "^GSPC")
    pub symbol: String,
}

/// Price on a given date.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PriceByDateParams {
    /// Ticker symbol
    pub symbol: String,
    /// Date as YYYY-MM-DD; the first trading day on or after it is used
    pub date: String,
}

/// Prices between two dates.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DateRangeParams {
    /// Ticker symbol
    pub symbol: String,
    /// First date, YYYY-MM-DD
    pub start_date: String,
    /// Last date (inclusive), YYYY-MM-DD
    pub end_date: String,
}

/// Prices over a look-back period.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct HistoricalParams {
    /// Ticker symbol
    pub symbol: String,
    /// One of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max
    #[serde(default)]
    pub period: Period,
    /// One of 1d, 5d, 1wk, 1mo, 3mo
    #[serde(default)]
    pub interval: Interval,
}

/// A financial statement request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StatementParams {
    /// Ticker symbol
    pub symbol: String,
    /// One of yearly, quarterly, trailing
    #[serde(default)]
    pub freq: StatementFrequency,
}

/// Earnings calendar request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EarningsParams {
    /// Ticker symbol
    pub symbol: String,
    /// Maximum number of dates, newest first
    #[serde(default = "default_earnings_limit")]
    pub limit: usize,
}

// ============================================================================
// Charts
// ============================================================================

/// Market dashboard over a set of indices.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DashboardParams {
    /// Comma-separated index symbols
    #[serde(default = "default_indices")]
    pub indices: String,
    /// Look-back period
    #[serde(default = "six_months")]
    pub period: Period,
}

/// Equal-weight portfolio report.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PortfolioReportParams {
    /// Comma-separated holdings
    #[serde(default = "default_report_symbols")]
    pub symbols: String,
    /// Look-back period
    #[serde(default = "one_year")]
    pub period: Period,
}

/// Technical analysis of one symbol.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TechnicalParams {
    /// Ticker symbol
    #[serde(default = "default_technical_symbol")]
    pub symbol: String,
    /// Look-back period
    #[serde(default = "one_year")]
    pub period: Period,
}

// ============================================================================
// Metrics
// ============================================================================

/// Which prices a metric is computed over: explicit dates or a period.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct WindowParams {
    /// First date, YYYY-MM-DD; when given, `period` must be omitted
    #[serde(default)]
    pub start_date: Option<String>,
    /// Last date (inclusive), YYYY-MM-DD; defaults to today when `start_date` is given
    #[serde(default)]
    pub end_date: Option<String>,
    /// Look-back period, 1y when no dates are given
    #[serde(default)]
    pub period: Option<Period>,
    /// Bar interval
    #[serde(default)]
    pub interval: Interval,
}

impl WindowParams {
    /// The history range these arguments select.
    pub fn range(&self) -> ToolResult<HistoryRange> {
        match (&self.start_date, &self.end_date, self.period) {
            (None, None, period) => Ok(HistoryRange::Period(period.unwrap_or(Period::OneYear))),
            (_, _, Some(_)) => Err(ToolError::invalid(
                "give either start_date/end_date or period, not both",
            )),
            (None, Some(_), None) => Err(ToolError::invalid("end_date requires start_date")),
            (Some(start), end, None) => {
                let start = parse_date("start_date", start)?;
                let end = match end {
                    Some(end) => parse_date("end_date", end)?,
                    None => Date::today(),
                };
                if start > end {
                    return Err(ToolError::invalid(format!(
                        "start_date {start} is after end_date {end}"
                    )));
                }
                Ok(HistoryRange::Between { start, end })
            }
        }
    }

    /// A history request for `symbol` over this window.
    pub fn request(&self, symbol: Symbol) -> ToolResult<HistoryRequest> {
        Ok(HistoryRequest {
            symbol,
            range: self.range()?,
            interval: self.interval,
        })
    }

    /// Explicit override, else the interval's conventional bars per year.
    pub fn periods_per_year(&self, explicit: Option<f64>) -> ToolResult<f64> {
        match explicit {
            Some(p) if !(p.is_finite() && p > 0.0) => Err(ToolError::invalid(format!(
                "periods_per_year must be positive, got {p}"
            ))),
            Some(p) => Ok(p),
            None => Ok(self.interval.periods_per_year()),
        }
    }
}

/// One symbol over a window.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SeriesParams {
    /// Ticker symbol
    pub symbol: String,
    /// Price window
    #[serde(flatten)]
    pub window: WindowParams,
}

/// Moving average flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MovingAverageKind {
    /// Equal-weight trailing mean
    #[default]
    Simple,
    /// Exponentially weighted, seeded with the simple mean
    Exponential,
}

/// Moving average request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MovingAverageParams {
    /// Ticker symbol
    pub symbol: String,
    /// Price window
    #[serde(flatten)]
    pub window: WindowParams,
    /// Number of bars averaged
    #[serde(default = "default_ma_length")]
    pub length: usize,
    /// simple or exponential
    #[serde(default)]
    pub kind: MovingAverageKind,
}

/// RSI request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RsiParams {
    /// Ticker symbol
    pub symbol: String,
    /// Price window
    #[serde(flatten)]
    pub window: WindowParams,
    /// Number of price changes per RSI value
    #[serde(default = "default_rsi_length")]
    pub length: usize,
}

/// MACD request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MacdParams {
    /// Ticker symbol
    pub symbol: String,
    /// Price window
    #[serde(flatten)]
    pub window: WindowParams,
    /// Fast EMA span
    #[serde(default = "default_macd_fast")]
    pub fast: usize,
    /// Slow EMA span
    #[serde(default = "default_macd_slow")]
    pub slow: usize,
    /// Signal EMA span
    #[serde(default = "default_macd_signal")]
    pub signal: usize,
}

/// Volatility request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VolatilityParams {
    /// Ticker symbol
    pub symbol: String,
    /// Price window
    #[serde(flatten)]
    pub window: WindowParams,
    /// Annualization factor; defaults to the interval's bars per year
    #[serde(default)]
    pub periods_per_year: Option<f64>,
}

/// Sharpe ratio request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SharpeParams {
    /// Ticker symbol
    pub symbol: String,
    /// Price window
    #[serde(flatten)]
    pub window: WindowParams,
    /// Annual risk-free rate as a fraction (0.04 = 4%)
    #[serde(default)]
    pub risk_free_rate: f64,
    /// Annualization factor; defaults to the interval's bars per year
    #[serde(default)]
    pub periods_per_year: Option<f64>,
}

/// Value-at-risk estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VarMethod {
    /// Empirical quantile of the observed returns
    #[default]
    Historical,
    /// Normal distribution fitted to the returns
    Parametric,
}

/// Value-at-risk request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VarParams {
    /// Ticker symbol
    pub symbol: String,
    /// Price window
    #[serde(flatten)]
    pub window: WindowParams,
    /// Confidence level in (0, 1)
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// historical or parametric
    #[serde(default)]
    pub method: VarMethod,
}

/// Beta request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BetaParams {
    /// Ticker symbol
    pub symbol: String,
    /// Benchmark symbol
    #[serde(default = "default_market_symbol")]
    pub market_symbol: String,
    /// Price window
    #[serde(flatten)]
    pub window: WindowParams,
}

/// What a correlation matrix correlates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationOn {
    /// Period returns
    #[default]
    Returns,
    /// Price levels
    Prices,
}

impl From<CorrelationOn> for CorrelationBasis {
    fn from(on: CorrelationOn) -> Self {
        match on {
            CorrelationOn::Returns => CorrelationBasis::Returns,
            CorrelationOn::Prices => CorrelationBasis::Prices,
        }
    }
}

/// Correlation matrix request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CorrelationParams {
    /// Comma-separated symbols
    pub symbols: String,
    /// Price window
    #[serde(flatten)]
    pub window: WindowParams,
    /// returns or prices
    #[serde(default)]
    pub basis: CorrelationOn,
}

/// Portfolio performance request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PortfolioParams {
    /// Comma-separated SYMBOL:WEIGHT pairs, or bare symbols for equal weights
    #[serde(default = "default_holdings")]
    pub holdings: String,
    /// Price window
    #[serde(flatten)]
    pub window: WindowParams,
    /// Annual risk-free rate as a fraction
    #[serde(default)]
    pub risk_free_rate: f64,
    /// Annualization factor; defaults to the interval's bars per year
    #[serde(default)]
    pub periods_per_year: Option<f64>,
}
