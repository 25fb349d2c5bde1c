//! Simple and exponential moving averages.

use tickerlens_core::PriceSeries;

use crate::error::{MetricsError, MetricsResult};
use crate::stats::{ensure_finite, mean};

/// Simple moving average of a price series.
///
/// Returns `len - window + 1` values; value `k` averages prices
/// `k..k + window`.
///
/// # Errors
///
/// `InvalidInput` when `window == 0` or `window > len`.
pub fn moving_average(series: &PriceSeries, window: usize) -> MetricsResult<Vec<f64>> {
    check_window(window, series.len(), series.symbol().as_str())?;
    Ok(series.prices().windows(window).map(mean).collect())
}

/// Exponential moving average with smoothing `2 / (span + 1)`.
///
/// The average is seeded with the simple mean of the first `span` values,
/// so the output has `len - span + 1` entries and the first one equals that
/// mean.
///
/// # Errors
///
/// `InvalidInput` when `span == 0`, `span > len`, or a value is non-finite.
pub fn exponential_moving_average(values: &[f64], span: usize) -> MetricsResult<Vec<f64>> {
    check_window(span, values.len(), "values")?;
    ensure_finite(values, "values")?;

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut current = mean(&values[..span]);
    let mut out = Vec::with_capacity(values.len() - span + 1);
    out.push(current);
    for v in &values[span..] {
        current = alpha * v + (1.0 - alpha) * current;
        out.push(current);
    }
    Ok(out)
}

pub(crate) fn check_window(window: usize, len: usize, label: &str) -> MetricsResult<()> {
    if window == 0 {
        return Err(MetricsError::invalid("window must be at least 1"));
    }
    if window > len {
        return Err(MetricsError::invalid(format!(
            "{label}: window {window} exceeds series length {len}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tickerlens_core::Date;

    fn series(prices: &[f64]) -> PriceSeries {
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        PriceSeries::from_pairs(
            "TEST",
            prices
                .iter()
                .enumerate()
                .map(|(i, p)| (start.add_days(i as i64), *p))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_sma_values_and_length() {
        let ma = moving_average(&series(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3).unwrap();
        assert_eq!(ma, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_sma_window_equal_to_length() {
        let ma = moving_average(&series(&[2.0, 4.0]), 2).unwrap();
        assert_eq!(ma, vec![3.0]);
    }

    #[test]
    fn test_sma_rejects_bad_window() {
        let s = series(&[1.0, 2.0, 3.0]);
        assert!(matches!(moving_average(&s, 0), Err(MetricsError::InvalidInput(_))));
        assert!(matches!(moving_average(&s, 4), Err(MetricsError::InvalidInput(_))));
        assert!(moving_average(&series(&[]), 1).is_err());
    }

    #[test]
    fn test_ema_seed_and_recursion() {
        let ema = exponential_moving_average(&[1.0, 2.0, 3.0, 4.0], 3).unwrap();
        assert_eq!(ema.len(), 2);
        assert_relative_eq!(ema[0], 2.0);
        // alpha = 0.5: 0.5 * 4 + 0.5 * 2
        assert_relative_eq!(ema[1], 3.0);
    }

    #[test]
    fn test_ema_constant_input() {
        let ema = exponential_moving_average(&[5.0; 10], 4).unwrap();
        assert!(ema.iter().all(|v| (*v - 5.0).abs() < 1e-12));
    }
}
