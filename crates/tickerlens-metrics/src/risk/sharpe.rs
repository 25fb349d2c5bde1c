//! Annualized volatility and Sharpe ratio.

use crate::error::{MetricsError, MetricsResult};
use crate::returns::ensure_periods_per_year;
use crate::stats::{ensure_finite, mean, sample_std, DEGENERATE_EPSILON};

/// Trading days per year, the default annualization factor for daily data.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Sample standard deviation of per-period returns scaled by
/// `sqrt(periods_per_year)`.
///
/// # Errors
///
/// `InvalidInput` for fewer than 2 returns, non-finite returns, or a
/// non-positive `periods_per_year`.
pub fn annualized_volatility(returns: &[f64], periods_per_year: f64) -> MetricsResult<f64> {
    check_returns(returns)?;
    ensure_periods_per_year(periods_per_year)?;
    Ok(sample_std(returns) * periods_per_year.sqrt())
}

/// Annualized Sharpe ratio.
///
/// ```text
/// sharpe = (mean(r) - rf / periods_per_year) / stdev(r) * sqrt(periods_per_year)
/// ```
///
/// `risk_free_rate` is an annual rate; `returns` are per period. The
/// standard deviation is the sample one (n - 1).
///
/// # Errors
///
/// `InvalidInput` for fewer than 2 returns, non-finite input, a
/// non-positive `periods_per_year`, or returns with zero dispersion.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: f64) -> MetricsResult<f64> {
    check_returns(returns)?;
    ensure_periods_per_year(periods_per_year)?;
    if !risk_free_rate.is_finite() {
        return Err(MetricsError::invalid(format!(
            "risk_free_rate must be finite, got {risk_free_rate}"
        )));
    }

    let std = sample_std(returns);
    if std <= DEGENERATE_EPSILON {
        return Err(MetricsError::invalid(
            "Sharpe ratio is undefined for returns with zero standard deviation",
        ));
    }
    let excess = mean(returns) - risk_free_rate / periods_per_year;
    Ok(excess / std * periods_per_year.sqrt())
}

fn check_returns(returns: &[f64]) -> MetricsResult<()> {
    if returns.len() < 2 {
        return Err(MetricsError::invalid(format!(
            "at least 2 returns are required, got {}",
            returns.len()
        )));
    }
    ensure_finite(returns, "returns")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sharpe_known_value() {
        let r = [0.01, 0.02, -0.01, 0.03];
        // mean 0.0125, sample std = sqrt(0.000291666..)
        let std = (0.000_875_f64 / 3.0).sqrt();
        let expected = 0.0125 / std * 252.0_f64.sqrt();
        assert_relative_eq!(sharpe_ratio(&r, 0.0, 252.0).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_sharpe_risk_free_is_annual() {
        let r = [0.01, 0.02, -0.01, 0.03];
        let with_rf = sharpe_ratio(&r, 0.0252, 252.0).unwrap();
        let std = (0.000_875_f64 / 3.0).sqrt();
        assert_relative_eq!(with_rf, (0.0125 - 0.0001) / std * 252.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_sharpe_zero_dispersion() {
        assert!(matches!(
            sharpe_ratio(&[0.01; 10], 0.0, 252.0),
            Err(MetricsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_sharpe_guards() {
        assert!(sharpe_ratio(&[0.01], 0.0, 252.0).is_err());
        assert!(sharpe_ratio(&[0.01, 0.02], f64::NAN, 252.0).is_err());
        assert!(sharpe_ratio(&[0.01, 0.02], 0.0, 0.0).is_err());
    }

    #[test]
    fn test_volatility() {
        let r = [0.01, -0.01, 0.01, -0.01];
        let std = (0.0004_f64 / 3.0).sqrt();
        assert_relative_eq!(annualized_volatility(&r, 12.0).unwrap(), std * 12.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(annualized_volatility(&[0.02; 5], 252.0).unwrap(), 0.0);
    }
}
