//! Descriptive statistics shared by the metric modules.
//!
//! Callers validate lengths before calling in; these helpers assume
//! non-empty input (and at least two points for sample moments).

use crate::error::{MetricsError, MetricsResult};

/// Dispersion below which a series is treated as constant.
pub(crate) const DEGENERATE_EPSILON: f64 = 1e-12;

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator).
pub(crate) fn sample_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

pub(crate) fn sample_std(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Sample covariance (n - 1 denominator). `x` and `y` must have equal length.
pub(crate) fn sample_covariance(x: &[f64], y: &[f64]) -> f64 {
    let mx = mean(x);
    let my = mean(y);
    x.iter()
        .zip(y)
        .map(|(a, b)| (a - mx) * (b - my))
        .sum::<f64>()
        / (x.len() - 1) as f64
}

/// Pearson correlation, or `None` when either side has no dispersion.
///
/// The result is clamped to [-1, 1] to absorb rounding.
pub(crate) fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let mx = mean(x);
    let my = mean(y);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let n = (x.len() - 1) as f64;
    if (sxx / n).sqrt() <= DEGENERATE_EPSILON || (syy / n).sqrt() <= DEGENERATE_EPSILON {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Linearly interpolated quantile of an ascending slice, `q` in [0, 1].
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Rejects non-finite entries with a message naming `what`.
pub(crate) fn ensure_finite(values: &[f64], what: &str) -> MetricsResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(MetricsError::invalid(format!(
            "{what} contains a non-finite value at index {i}"
        ))),
        None => Ok(()),
    }
}

/// Rejects non-positive prices, which make returns undefined.
pub(crate) fn ensure_positive_prices(prices: &[f64], symbol: &str) -> MetricsResult<()> {
    match prices.iter().position(|p| *p <= 0.0) {
        Some(i) => Err(MetricsError::invalid(format!(
            "{symbol} has a non-positive price ({}) at index {i}",
            prices[i]
        ))),
        None => Ok(()),
    }
}
