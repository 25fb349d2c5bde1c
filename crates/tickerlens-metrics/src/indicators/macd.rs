//! Moving average convergence/divergence.

use serde::Serialize;

use tickerlens_core::{Date, PriceSeries};

use super::moving_average::exponential_moving_average;
use crate::error::{MetricsError, MetricsResult};

/// Conventional fast EMA span.
pub const DEFAULT_MACD_FAST: usize = 12;
/// Conventional slow EMA span.
pub const DEFAULT_MACD_SLOW: usize = 26;
/// Conventional signal EMA span.
pub const DEFAULT_MACD_SIGNAL: usize = 9;

/// MACD output. All four vectors have the same length and index `i` of each
/// refers to `dates[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Macd {
    /// Dates of the aligned values.
    pub dates: Vec<Date>,
    /// EMA(fast) - EMA(slow).
    pub macd_line: Vec<f64>,
    /// EMA(signal) of the MACD line.
    pub signal_line: Vec<f64>,
    /// MACD line minus signal line.
    pub histogram: Vec<f64>,
}

impl Macd {
    /// Number of aligned points.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when no point survived the look-back.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// MACD of a price series.
///
/// The MACD line exists from the price at index `slow - 1`; the signal line
/// needs another `signal - 1` MACD values. Outputs are aligned to that
/// longest look-back and the earlier MACD values are dropped, giving
/// `len - (slow + signal - 2)` points.
///
/// # Errors
///
/// `InvalidInput` when a span is zero, `fast >= slow`, or the series has
/// fewer than `slow + signal - 1` prices.
pub fn macd(series: &PriceSeries, fast: usize, slow: usize, signal: usize) -> MetricsResult<Macd> {
    if fast == 0 || slow == 0 || signal == 0 {
        return Err(MetricsError::invalid("MACD spans must all be at least 1"));
    }
    if fast >= slow {
        return Err(MetricsError::invalid(format!(
            "MACD fast span ({fast}) must be shorter than slow span ({slow})"
        )));
    }
    let required = slow
        .checked_add(signal - 1)
        .ok_or_else(|| MetricsError::invalid(format!("MACD spans ({slow},{signal}) are too large")))?;
    if series.len() < required {
        return Err(MetricsError::invalid(format!(
            "{}: MACD({fast},{slow},{signal}) needs at least {required} prices, got {}",
            series.symbol(),
            series.len()
        )));
    }

    let prices = series.prices();
    let fast_ema = exponential_moving_average(&prices, fast)?;
    let slow_ema = exponential_moving_average(&prices, slow)?;

    // fast_ema[k] is at price index k + fast - 1, slow_ema[k] at k + slow - 1.
    let offset = slow - fast;
    let full_macd: Vec<f64> = slow_ema
        .iter()
        .enumerate()
        .map(|(k, s)| fast_ema[k + offset] - s)
        .collect();

    let signal_line = exponential_moving_average(&full_macd, signal)?;
    let macd_line = full_macd[signal - 1..].to_vec();
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();
    let dates = series.dates()[required - 1..].to_vec();

    Ok(Macd {
        dates,
        macd_line,
        signal_line,
        histogram,
    })
}
