//! Technical indicators over price series.
//!
//! - **Moving averages**: simple and exponential
//! - **RSI**: rolling-window relative strength index
//! - **MACD**: moving average convergence/divergence with signal line
//! - **Levels**: trailing support and resistance
//!
//! Every indicator omits values whose lookback has not filled; nothing is
//! zero-padded, so output lengths are always shorter than the input.

mod levels;
mod macd;
mod moving_average;
mod rsi;

pub use levels::{support_resistance, SupportResistance};
pub use macd::{macd, Macd, DEFAULT_MACD_FAST, DEFAULT_MACD_SIGNAL, DEFAULT_MACD_SLOW};
pub use moving_average::{exponential_moving_average, moving_average};
pub use rsi::{rsi, DEFAULT_RSI_WINDOW, RSI_OVERBOUGHT, RSI_OVERSOLD};
