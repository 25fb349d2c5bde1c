//! Domain types for market data and financial metrics.
//!
//! - [`Date`]: Calendar date of an observation
//! - [`Symbol`]: Ticker symbol in Yahoo Finance format
//! - [`PriceSeries`] / [`ReturnSeries`]: Validated time series
//! - [`PortfolioSpec`]: Symbol to weight mapping
//! - [`MetricResult`] / [`CorrelationMatrix`]: Metric outputs
//! - [`Period`], [`Interval`], [`StatementFrequency`]: Request vocabulary
//! - [`Quote`], [`DividendEvent`], [`FinancialStatement`], [`EarningsDate`],
//!   [`NewsItem`]: Provider records

mod date;
mod fundamentals;
mod market;
mod metric;
mod portfolio;
mod series;
mod symbol;

pub use date::Date;
pub use fundamentals::{
    DividendEvent, EarningsDate, FinancialStatement, LineItem, NewsItem, Quote, StatementKind,
};
pub use market::{Interval, Period, StatementFrequency};
pub use metric::{CorrelationMatrix, MetricResult, MetricValue};
pub use portfolio::PortfolioSpec;
pub use series::{PricePoint, PriceSeries, ReturnSeries};
pub use symbol::Symbol;
