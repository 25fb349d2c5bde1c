//! # TickerLens Ext File
//!
//! File-based market data for TickerLens.
//!
//! [`CsvMarketData`] serves price history, current price and dividends
//! from a directory of CSV exports, for offline use, demos and tests:
//!
//! ```text
//! data/
//!   AAPL.csv             date,close[,...]
//!   AAPL.dividends.csv   date,amount
//! ```
//!
//! Fundamentals, earnings and news are not available from files.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod market_data;

pub use market_data::CsvMarketData;

use std::path::Path;
use std::sync::Arc;

use tickerlens_traits::{MarketDataProvider, ProviderResult};

/// Creates a CSV provider behind the provider trait object.
///
/// # Errors
///
/// `InvalidRequest` when `dir` is not a directory.
pub fn create_file_market_data(dir: impl AsRef<Path>) -> ProviderResult<Arc<dyn MarketDataProvider>> {
    Ok(Arc::new(CsvMarketData::new(dir)?))
}
