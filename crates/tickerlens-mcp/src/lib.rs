//! # TickerLens MCP Server
//!
//! Model Context Protocol (MCP) server exposing market data, charts and the
//! TickerLens metrics engine to AI assistants and other MCP clients.
//!
//! ## Features
//!
//! - **Market Data**: quotes, price history, dividends, statements, earnings, news
//! - **Metrics**: returns, indicators, volatility, Sharpe, drawdown, VaR, beta,
//!   correlation, portfolio performance, valuation ratios
//! - **Charts**: market dashboard, portfolio report and technical analysis as SVG
//! - **Providers**: Yahoo Finance, a directory of CSV files, or synthetic demo data
//! - **Multiple Transports**: stdio (local) and HTTP (remote)
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with stdio transport against Yahoo Finance
//! tickerlens-mcp-server
//!
//! # Serve CSV files over HTTP
//! tickerlens-mcp-server --http --port 8080 --data-dir ./prices
//!
//! # Run in demo mode with synthetic data
//! tickerlens-mcp-server --demo
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod demo;
pub mod error;
pub mod params;
pub mod server;
mod tools;

pub use server::TickerLensMcpServer;

/// Server name for MCP protocol
pub const SERVER_NAME: &str = "tickerlens-mcp";

/// Server version (same as crate version)
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
