// =============================================================================
// Relative Strength Index (RSI), rolling-window form
// =============================================================================
//
// For every run of `window` consecutive price changes:
//   avg_up   = sum(max(delta, 0)) / window
//   avg_down = sum(max(-delta, 0)) / window
//   RS       = avg_up / avg_down
//   RSI      = 100 - 100 / (1 + RS)
//
// When avg_down is zero the window had no losses and RSI is 100.
// =============================================================================

use tickerlens_core::PriceSeries;

use crate::error::{MetricsError, MetricsResult};

/// Conventional RSI look-back.
pub const DEFAULT_RSI_WINDOW: usize = 14;

/// RSI level above which a market is usually called overbought.
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// RSI level below which a market is usually called oversold.
pub const RSI_OVERSOLD: f64 = 30.0;

/// Rolling RSI of a price series, values in [0, 100].
///
/// The output has `len - window` values: one per full window of price
/// changes, the first ending at price index `window`.
///
/// # Errors
///
/// `InvalidInput` when `window == 0` or the series has `window` or fewer
/// prices.
pub fn rsi(series: &PriceSeries, window: usize) -> MetricsResult<Vec<f64>> {
    if window == 0 {
        return Err(MetricsError::invalid("RSI window must be at least 1"));
    }
    if series.len() <= window {
        return Err(MetricsError::invalid(format!(
            "{}: RSI({window}) needs at least {} prices, got {}",
            series.symbol(),
            window.saturating_add(1),
            series.len()
        )));
    }

    let deltas: Vec<f64> = series.prices().windows(2).map(|w| w[1] - w[0]).collect();
    let n = window as f64;

    Ok(deltas
        .windows(window)
        .map(|w| {
            let (up, down) = w.iter().fold((0.0_f64, 0.0_f64), |(u, d), &delta| {
                if delta > 0.0 {
                    (u + delta, d)
                } else {
                    (u, d - delta)
                }
            });
            rsi_from_averages(up / n, down / n)
        })
        .collect())
}

fn rsi_from_averages(avg_up: f64, avg_down: f64) -> f64 {
    if avg_down == 0.0 {
        return 100.0;
    }
    let rs = avg_up / avg_down;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}
