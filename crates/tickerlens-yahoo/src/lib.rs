//! # TickerLens Yahoo
//!
//! Yahoo Finance implementation of [`MarketDataProvider`].
//!
//! Endpoints used:
//! - `v8/finance/chart`: closing prices, the current price and dividends
//! - `ws/fundamentals-timeseries`: income statement and cash-flow lines
//! - `v10/finance/quoteSummary`: earnings history and the next earnings date
//! - `v1/finance/search`: news headlines
//!
//! `quoteSummary` requires a session cookie plus a crumb token. The crumb is
//! cached for [`YahooConfig::crumb_ttl_secs`] and refreshed once when Yahoo
//! answers 401 or 429.
//!
//! Bar timestamps are converted to exchange-local dates with the chart's
//! `gmtoffset`, so a US close is dated on its trading day regardless of the
//! server's time zone.
//!
//! [`MarketDataProvider`]: tickerlens_traits::MarketDataProvider

#![warn(missing_docs)]
#![warn(clippy::all)]

mod auth;
mod config;
mod provider;
pub mod wire;

pub use config::YahooConfig;
pub use provider::YahooProvider;
