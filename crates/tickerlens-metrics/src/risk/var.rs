//! Value at Risk and expected shortfall over per-period returns.
//!
//! All three measures are reported as returns: a 95% VaR of `-0.021`
//! means one period in twenty is expected to lose 2.1% or more.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{MetricsError, MetricsResult};
use crate::stats::{ensure_finite, mean, quantile_sorted, sample_std};

/// Default confidence level for VaR.
pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.95;

/// Historical-simulation VaR: the `1 - confidence` quantile of the
/// returns, linearly interpolated between order statistics.
///
/// # Errors
///
/// `InvalidInput` for empty or non-finite returns, or a confidence outside
/// the open interval (0, 1).
pub fn value_at_risk(returns: &[f64], confidence: f64) -> MetricsResult<f64> {
    let sorted = sorted_returns(returns, confidence)?;
    Ok(quantile_sorted(&sorted, 1.0 - confidence))
}

/// Parametric (normal) VaR: `mean + z * stdev` with `z` the standard
/// normal quantile at `1 - confidence`.
///
/// # Errors
///
/// `InvalidInput` for fewer than 2 returns, non-finite returns, or a
/// confidence outside (0, 1).
pub fn parametric_var(returns: &[f64], confidence: f64) -> MetricsResult<f64> {
    check_confidence(confidence)?;
    if returns.len() < 2 {
        return Err(MetricsError::invalid(format!(
            "parametric VaR needs at least 2 returns, got {}",
            returns.len()
        )));
    }
    ensure_finite(returns, "returns")?;

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| MetricsError::degenerate(format!("standard normal: {e}")))?;
    let z = normal.inverse_cdf(1.0 - confidence);
    Ok(mean(returns) + z * sample_std(returns))
}

/// Expected shortfall (CVaR): mean of the returns at or below the
/// historical VaR.
///
/// # Errors
///
/// Same conditions as [`value_at_risk`].
pub fn expected_shortfall(returns: &[f64], confidence: f64) -> MetricsResult<f64> {
    let sorted = sorted_returns(returns, confidence)?;
    let var = quantile_sorted(&sorted, 1.0 - confidence);
    // sorted[0] <= var always holds, so the tail is never empty
    let tail_len = sorted.partition_point(|r| *r <= var);
    Ok(mean(&sorted[..tail_len.max(1)]))
}

fn sorted_returns(returns: &[f64], confidence: f64) -> MetricsResult<Vec<f64>> {
    check_confidence(confidence)?;
    if returns.is_empty() {
        return Err(MetricsError::invalid("returns must not be empty"));
    }
    ensure_finite(returns, "returns")?;
    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

fn check_confidence(confidence: f64) -> MetricsResult<()> {
    if confidence > 0.0 && confidence < 1.0 {
        Ok(())
    } else {
        Err(MetricsError::invalid(format!(
            "confidence must be strictly between 0 and 1, got {confidence}"
        )))
    }
}
