//! Market beta.

use crate::error::{MetricsError, MetricsResult};
use crate::stats::{ensure_finite, sample_covariance, sample_variance, DEGENERATE_EPSILON};

/// Beta of an asset against a market: `cov(asset, market) / var(market)`,
/// both sample moments over aligned returns.
///
/// # Errors
///
/// `InvalidInput` when the lengths differ, fewer than 2 points are given,
/// a value is non-finite, or the market returns have zero variance.
pub fn beta(asset_returns: &[f64], market_returns: &[f64]) -> MetricsResult<f64> {
    if asset_returns.len() != market_returns.len() {
        return Err(MetricsError::invalid(format!(
            "asset and market returns differ in length ({} vs {})",
            asset_returns.len(),
            market_returns.len()
        )));
    }
    if asset_returns.len() < 2 {
        return Err(MetricsError::invalid(format!(
            "beta needs at least 2 aligned returns, got {}",
            asset_returns.len()
        )));
    }
    ensure_finite(asset_returns, "asset returns")?;
    ensure_finite(market_returns, "market returns")?;

    let market_var = sample_variance(market_returns);
    if market_var.sqrt() <= DEGENERATE_EPSILON {
        return Err(MetricsError::invalid(
            "beta is undefined when market returns have zero variance",
        ));
    }
    Ok(sample_covariance(asset_returns, market_returns) / market_var)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scaled_market() {
        let market = [0.01, -0.02, 0.015, 0.003];
        let asset: Vec<f64> = market.iter().map(|r| 1.5 * r + 0.001).collect();
        assert_relative_eq!(beta(&asset, &market).unwrap(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(beta(&market, &market).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_guards() {
        assert!(beta(&[0.1, 0.2], &[0.1]).is_err());
        assert!(beta(&[0.1], &[0.1]).is_err());
        assert!(matches!(
            beta(&[0.1, 0.2, 0.3], &[0.01, 0.01, 0.01]),
            Err(MetricsError::InvalidInput(_))
        ));
    }
}
