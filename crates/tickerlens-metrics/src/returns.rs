//! Period returns and return aggregates.

use tickerlens_core::{PriceSeries, ReturnSeries};

use crate::error::{MetricsError, MetricsResult};
use crate::stats::{ensure_finite, ensure_positive_prices};

/// Computes period-over-period returns of a price series.
///
/// `returns[i] = price[i+1] / price[i] - 1`, dated at `price[i+1]`.
///
/// # Errors
///
/// `InvalidInput` when the series has fewer than two points or any price is
/// non-positive.
///
/// # Example
///
/// ```rust
/// use tickerlens_core::{Date, PriceSeries};
/// use tickerlens_metrics::compute_returns;
///
/// let d = |day| Date::from_ymd(2025, 1, day).unwrap();
/// let series = PriceSeries::from_pairs("X", vec![(d(2), 10.0), (d(3), 11.0)]).unwrap();
/// let r = compute_returns(&series).unwrap();
/// assert!((r.values[0] - 0.1).abs() < 1e-12);
/// ```
pub fn compute_returns(series: &PriceSeries) -> MetricsResult<ReturnSeries> {
    let symbol = series.symbol().as_str();
    if series.len() < 2 {
        return Err(MetricsError::invalid(format!(
            "{symbol}: at least 2 prices are required to compute returns, got {}",
            series.len()
        )));
    }
    let prices = series.prices();
    let values = simple_returns(&prices, symbol)?;
    Ok(ReturnSeries {
        symbol: series.symbol().clone(),
        dates: series.dates()[1..].to_vec(),
        values,
    })
}

/// Returns of a bare price slice; same rules as [`compute_returns`].
///
/// # Errors
///
/// `InvalidInput` when fewer than two prices or any price is non-positive.
pub fn simple_returns(prices: &[f64], label: &str) -> MetricsResult<Vec<f64>> {
    if prices.len() < 2 {
        return Err(MetricsError::invalid(format!(
            "{label}: at least 2 prices are required to compute returns, got {}",
            prices.len()
        )));
    }
    ensure_finite(prices, label)?;
    ensure_positive_prices(prices, label)?;
    Ok(prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect())
}

/// Compounded return over the whole return sequence.
///
/// # Errors
///
/// `InvalidInput` for empty or non-finite returns.
pub fn total_return(returns: &[f64]) -> MetricsResult<f64> {
    if returns.is_empty() {
        return Err(MetricsError::invalid("returns must not be empty"));
    }
    ensure_finite(returns, "returns")?;
    Ok(returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0)
}

/// Geometric annualized return: `(1 + total)^(periods_per_year / n) - 1`.
///
/// # Errors
///
/// `InvalidInput` for empty returns, a non-positive `periods_per_year`, or a
/// total loss (growth factor of zero or less); `NumericDegenerate` when the
/// compounded figure overflows `f64`.
pub fn annualized_return(returns: &[f64], periods_per_year: f64) -> MetricsResult<f64> {
    ensure_periods_per_year(periods_per_year)?;
    let growth = 1.0 + total_return(returns)?;
    if growth <= 0.0 {
        return Err(MetricsError::invalid(
            "cannot annualize a total loss of 100% or more",
        ));
    }
    let annualized = growth.powf(periods_per_year / returns.len() as f64) - 1.0;
    if !annualized.is_finite() {
        return Err(MetricsError::degenerate(format!(
            "annualizing a growth factor of {growth} over {} periods overflows",
            returns.len()
        )));
    }
    Ok(annualized)
}

pub(crate) fn ensure_periods_per_year(periods_per_year: f64) -> MetricsResult<()> {
    if periods_per_year.is_finite() && periods_per_year > 0.0 {
        Ok(())
    } else {
        Err(MetricsError::invalid(format!(
            "periods_per_year must be positive and finite, got {periods_per_year}"
        )))
    }
}
