//! # TickerLens Metrics
//!
//! Deterministic financial metrics over validated price series.
//!
//! Every function in this crate is pure: inputs are explicit, nothing is
//! fetched, logged or cached, and identical inputs give bit-identical
//! outputs. Failures are either [`MetricsError::InvalidInput`] (the caller's
//! arguments are out of domain) or [`MetricsError::NumericDegenerate`] (the
//! statistic is undefined for well-formed data). NaN and infinity are never
//! returned.
//!
//! ## Features
//!
//! - **Returns**: period returns, total and annualized return
//! - **Indicators**: SMA, EMA, RSI, MACD, support/resistance
//! - **Risk**: volatility, Sharpe ratio, maximum drawdown, VaR, expected
//!   shortfall, beta
//! - **Cross-sectional**: correlation matrices, weighted portfolio performance
//! - **Ratios**: P/E, yields, payout ratio, profit margin
//!
//! ## Quick Start
//!
//! ```rust
//! use tickerlens_core::{Date, PriceSeries};
//! use tickerlens_metrics::prelude::*;
//!
//! let d = |day| Date::from_ymd(2025, 1, day).unwrap();
//! let series = PriceSeries::from_pairs(
//!     "SPY",
//!     vec![(d(2), 10.0), (d(3), 11.0), (d(6), 9.0), (d(7), 12.0)],
//! )
//! .unwrap();
//!
//! let returns = compute_returns(&series).unwrap();
//! assert_eq!(returns.len(), 3);
//!
//! let dd = max_drawdown(&series).unwrap();
//! assert!((dd - 2.0 / 11.0).abs() < 1e-12);
//! ```
//!
//! ## Conventions
//!
//! - Returns are simple (not log) per-period fractions.
//! - Annual quantities use `periods_per_year` (252 for daily data).
//! - Sample moments use the `n - 1` denominator.
//!
//! ## Feature Flags
//!
//! - `parallel`: evaluate correlation pairs on the rayon pool

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

mod align;
pub mod correlation;
pub mod error;
pub mod indicators;
pub mod portfolio;
pub mod ratios;
pub mod returns;
pub mod risk;
mod stats;

pub use error::{MetricsError, MetricsResult};

pub use align::common_dates;
pub use correlation::{correlation_matrix, correlation_matrix_with, CorrelationBasis};
pub use indicators::{
    exponential_moving_average, macd, moving_average, rsi, support_resistance, Macd,
    SupportResistance, DEFAULT_MACD_FAST, DEFAULT_MACD_SIGNAL, DEFAULT_MACD_SLOW,
    DEFAULT_RSI_WINDOW, RSI_OVERBOUGHT, RSI_OVERSOLD,
};
pub use portfolio::portfolio_performance;
pub use ratios::{
    dividend_yield, earnings_yield, payout_ratio, price_to_earnings, profit_margin,
    trailing_dividends, valuation_ratios, ValuationInputs, ValuationRatios,
};
pub use returns::{annualized_return, compute_returns, simple_returns, total_return};
pub use risk::{
    annualized_volatility, beta, expected_shortfall, max_drawdown, max_drawdown_values,
    parametric_var, sharpe_ratio, value_at_risk, DEFAULT_VAR_CONFIDENCE, TRADING_DAYS_PER_YEAR,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::correlation::{correlation_matrix, correlation_matrix_with, CorrelationBasis};
    pub use crate::error::{MetricsError, MetricsResult};
    pub use crate::indicators::*;
    pub use crate::portfolio::portfolio_performance;
    pub use crate::ratios::*;
    pub use crate::returns::*;
    pub use crate::risk::*;
}
