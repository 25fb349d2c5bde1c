//! Trailing support and resistance levels.

use serde::Serialize;

use tickerlens_core::PriceSeries;

use crate::error::{MetricsError, MetricsResult};

/// Lowest and highest close of a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SupportResistance {
    /// Minimum close in the window.
    pub support: f64,
    /// Maximum close in the window.
    pub resistance: f64,
    /// Most recent close.
    pub last: f64,
    /// Number of closes the levels were taken from.
    pub lookback: usize,
}

impl SupportResistance {
    /// Position of the last close within the band, 0 at support and 1 at
    /// resistance. `None` when the band has zero width.
    pub fn band_position(&self) -> Option<f64> {
        let width = self.resistance - self.support;
        (width > 0.0).then(|| (self.last - self.support) / width)
    }
}

/// Support (min) and resistance (max) of the last `lookback` closes.
///
/// # Errors
///
/// `InvalidInput` when `lookback == 0` or exceeds the series length.
pub fn support_resistance(series: &PriceSeries, lookback: usize) -> MetricsResult<SupportResistance> {
    if lookback == 0 {
        return Err(MetricsError::invalid("lookback must be at least 1"));
    }
    if lookback > series.len() {
        return Err(MetricsError::invalid(format!(
            "{}: lookback {lookback} exceeds series length {}",
            series.symbol(),
            series.len()
        )));
    }

    let tail = &series.points()[series.len() - lookback..];
    let (support, resistance) = tail.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.price), hi.max(p.price))
    });
    let last = tail[tail.len() - 1].price;

    Ok(SupportResistance {
        support,
        resistance,
        last,
        lookback,
    })
}
