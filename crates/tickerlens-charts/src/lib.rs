//! # TickerLens Charts
//!
//! Renders the report charts as standalone SVG documents.
//!
//! - [`market_dashboard`]: rebased index lines, period change and RSI readings
//! - [`portfolio_report`]: growth of each holding against an equal-weight
//!   portfolio, with total-return bars
//! - [`technical_analysis`]: price with moving averages and
//!   support/resistance, RSI and MACD panels
//!
//! Rendering is pure string building; callers fetch the data.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod dashboard;
pub mod error;
mod portfolio;
mod svg;
mod technical;

pub use dashboard::market_dashboard;
pub use error::{ChartError, ChartResult};
pub use portfolio::portfolio_report;
pub use technical::technical_analysis;
