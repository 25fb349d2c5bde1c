//! Maximum drawdown.

use tickerlens_core::PriceSeries;

use crate::error::{MetricsError, MetricsResult};
use crate::stats::{ensure_finite, ensure_positive_prices};

/// Largest peak-to-trough decline of a price series, as a fraction in [0, 1].
///
/// A non-decreasing series has drawdown 0.
///
/// # Errors
///
/// `InvalidInput` for an empty series or a non-positive price.
pub fn max_drawdown(series: &PriceSeries) -> MetricsResult<f64> {
    max_drawdown_values(&series.prices(), series.symbol().as_str())
}

/// [`max_drawdown`] over a bare value curve (prices or portfolio value).
///
/// # Errors
///
/// `InvalidInput` for empty, non-finite or non-positive values.
pub fn max_drawdown_values(values: &[f64], label: &str) -> MetricsResult<f64> {
    if values.is_empty() {
        return Err(MetricsError::invalid(format!(
            "{label}: max drawdown needs at least 1 value"
        )));
    }
    ensure_finite(values, label)?;
    ensure_positive_prices(values, label)?;

    let mut peak = values[0];
    let mut worst = 0.0_f64;
    for &v in values {
        peak = peak.max(v);
        worst = worst.max((peak - v) / peak);
    }
    Ok(worst.clamp(0.0, 1.0))
}
