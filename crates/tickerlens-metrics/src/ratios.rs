//! Simple valuation and profitability ratios.
//!
//! The single-ratio functions fail loudly; [`valuation_ratios`] collects
//! whatever subset is defined for the inputs at hand and leaves the rest
//! empty, which is what a quote-plus-statement lookup usually produces.

use serde::Serialize;

use tickerlens_core::{Date, DividendEvent};

use crate::error::{MetricsError, MetricsResult};

/// Price over earnings per share.
///
/// # Errors
///
/// `InvalidInput` for a non-positive or non-finite price; `NumericDegenerate`
/// when `eps <= 0`, where the ratio carries no meaning.
pub fn price_to_earnings(price: f64, eps: f64) -> MetricsResult<f64> {
    check_price(price)?;
    check_finite(eps, "eps")?;
    if eps <= 0.0 {
        return Err(MetricsError::degenerate(format!(
            "P/E is undefined for non-positive earnings ({eps})"
        )));
    }
    Ok(price / eps)
}

/// Earnings per share over price (may be negative).
///
/// # Errors
///
/// `InvalidInput` for a non-positive price or non-finite input.
pub fn earnings_yield(price: f64, eps: f64) -> MetricsResult<f64> {
    check_price(price)?;
    check_finite(eps, "eps")?;
    Ok(eps / price)
}

/// Annual dividends per share over price.
///
/// # Errors
///
/// `InvalidInput` for a non-positive price or negative dividends.
pub fn dividend_yield(annual_dividends: f64, price: f64) -> MetricsResult<f64> {
    check_price(price)?;
    check_finite(annual_dividends, "annual_dividends")?;
    if annual_dividends < 0.0 {
        return Err(MetricsError::invalid("annual dividends cannot be negative"));
    }
    Ok(annual_dividends / price)
}

/// Dividends per share over earnings per share.
///
/// # Errors
///
/// `NumericDegenerate` when `eps <= 0`.
pub fn payout_ratio(dividends_per_share: f64, eps: f64) -> MetricsResult<f64> {
    check_finite(dividends_per_share, "dividends_per_share")?;
    check_finite(eps, "eps")?;
    if eps <= 0.0 {
        return Err(MetricsError::degenerate(format!(
            "payout ratio is undefined for non-positive earnings ({eps})"
        )));
    }
    Ok(dividends_per_share / eps)
}

/// Net income over revenue.
///
/// # Errors
///
/// `NumericDegenerate` when `revenue <= 0`.
pub fn profit_margin(net_income: f64, revenue: f64) -> MetricsResult<f64> {
    check_finite(net_income, "net_income")?;
    check_finite(revenue, "revenue")?;
    if revenue <= 0.0 {
        return Err(MetricsError::degenerate(format!(
            "profit margin is undefined for non-positive revenue ({revenue})"
        )));
    }
    Ok(net_income / revenue)
}

/// Sum of dividends paid in the year ending on `as_of` (exclusive start,
/// inclusive end).
///
/// # Errors
///
/// `InvalidInput` when `as_of` cannot be moved back a year or an amount is
/// non-finite.
pub fn trailing_dividends(events: &[DividendEvent], as_of: Date) -> MetricsResult<f64> {
    let year_ago = as_of.add_years(-1)?;
    events
        .iter()
        .filter(|e| e.date > year_ago && e.date <= as_of)
        .try_fold(0.0, |acc, e| {
            check_finite(e.amount, "dividend amount")?;
            Ok(acc + e.amount)
        })
}

/// Inputs for [`valuation_ratios`]; any of the fundamentals may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ValuationInputs {
    /// Current price.
    pub price: f64,
    /// Trailing earnings per share.
    pub eps: Option<f64>,
    /// Dividends per share over the trailing year.
    pub annual_dividends: Option<f64>,
    /// Latest net income.
    pub net_income: Option<f64>,
    /// Latest revenue.
    pub revenue: Option<f64>,
}

/// The ratios defined for a [`ValuationInputs`]; undefined ones are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ValuationRatios {
    /// Price over earnings.
    pub price_to_earnings: Option<f64>,
    /// Earnings over price.
    pub earnings_yield: Option<f64>,
    /// Dividends over price.
    pub dividend_yield: Option<f64>,
    /// Dividends over earnings.
    pub payout_ratio: Option<f64>,
    /// Net income over revenue.
    pub profit_margin: Option<f64>,
}

/// Every ratio computable from `inputs`.
///
/// # Errors
///
/// `InvalidInput` only for a non-positive price; a missing or degenerate
/// fundamental leaves its ratio empty.
pub fn valuation_ratios(inputs: &ValuationInputs) -> MetricsResult<ValuationRatios> {
    check_price(inputs.price)?;
    let price = inputs.price;
    Ok(ValuationRatios {
        price_to_earnings: inputs.eps.and_then(|eps| price_to_earnings(price, eps).ok()),
        earnings_yield: inputs.eps.and_then(|eps| earnings_yield(price, eps).ok()),
        dividend_yield: inputs
            .annual_dividends
            .and_then(|d| dividend_yield(d, price).ok()),
        payout_ratio: inputs
            .annual_dividends
            .zip(inputs.eps)
            .and_then(|(d, eps)| payout_ratio(d, eps).ok()),
        profit_margin: inputs
            .net_income
            .zip(inputs.revenue)
            .and_then(|(ni, rev)| profit_margin(ni, rev).ok()),
    })
}

fn check_price(price: f64) -> MetricsResult<()> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(MetricsError::invalid(format!(
            "price must be positive and finite, got {price}"
        )))
    }
}

fn check_finite(value: f64, what: &str) -> MetricsResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MetricsError::invalid(format!("{what} must be finite")))
    }
}
