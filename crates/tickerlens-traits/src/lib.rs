//! # TickerLens Traits
//!
//! The contract between the tool layer and market-data sources.
//!
//! This crate contains ONLY the provider trait, its request types and its
//! error type. Implementations live in separate crates:
//!
//! - `tickerlens-yahoo`: Yahoo Finance over HTTP
//! - `tickerlens-ext-file`: CSV files on disk
//!
//! ## Dependency Injection
//!
//! The MCP server holds a single `Arc<dyn MarketDataProvider>` chosen at
//! startup:
//!
//! ```ignore
//! let provider: Arc<dyn MarketDataProvider> = match config.provider.kind {
//!     ProviderKind::Yahoo => Arc::new(YahooProvider::new(config.yahoo)?),
//!     ProviderKind::Csv => Arc::new(CsvProvider::open(&config.csv.data_dir)?),
//! };
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod market_data;

pub use error::{ProviderError, ProviderResult};
pub use market_data::{HistoryRange, HistoryRequest, MarketDataProvider, SourceType};
