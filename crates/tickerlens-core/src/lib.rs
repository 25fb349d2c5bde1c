//! # TickerLens Core
//!
//! Core value types shared by every TickerLens crate.
//!
//! This crate provides the request-scoped building blocks that flow between
//! the market-data providers, the metrics engine and the MCP tool layer:
//!
//! - **Dates and symbols**: [`Date`], [`Symbol`]
//! - **Series**: [`PriceSeries`] (validated, ascending, unique dates) and the
//!   derived [`ReturnSeries`]
//! - **Portfolios**: [`PortfolioSpec`] with the weight normalization policy
//! - **Results**: [`MetricResult`], [`MetricValue`], [`CorrelationMatrix`]
//! - **Market vocabulary**: [`Period`], [`Interval`], [`StatementFrequency`]
//! - **Fundamentals**: quotes, dividends, statements, earnings dates, news
//!
//! ## Design Philosophy
//!
//! - **Validate at the boundary**: a [`PriceSeries`] cannot be built with
//!   unordered, duplicated or non-finite points.
//! - **No shared state**: every type is a plain value, `Send + Sync`, and
//!   discarded after the request that produced it.
//!
//! ## Example
//!
//! ```rust
//! use tickerlens_core::prelude::*;
//!
//! let series = PriceSeries::from_pairs(
//!     "AAPL",
//!     vec![
//!         (Date::from_ymd(2025, 1, 2).unwrap(), 243.85),
//!         (Date::from_ymd(2025, 1, 3).unwrap(), 243.36),
//!     ],
//! )
//! .unwrap();
//! assert_eq!(series.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use types::*;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{
        CorrelationMatrix, Date, DividendEvent, EarningsDate, FinancialStatement, Interval,
        MetricResult, MetricValue, NewsItem, Period, PortfolioSpec, PricePoint, PriceSeries,
        Quote, ReturnSeries, StatementFrequency, StatementKind, Symbol,
    };
}
