//! Weighted portfolio performance.

use std::collections::BTreeMap;

use tickerlens_core::{MetricResult, PortfolioSpec, PriceSeries, Symbol};

use crate::align::{aligned_prices, common_dates};
use crate::error::{MetricsError, MetricsResult};
use crate::returns::{annualized_return, simple_returns, total_return};
use crate::risk::{annualized_volatility, max_drawdown_values, sharpe_ratio};

/// Label used for the synthetic portfolio value curve in error messages.
const PORTFOLIO_LABEL: &str = "PORTFOLIO";

/// Performance of a weighted basket, rebalanced to its weights every period.
///
/// Weights are normalized to sum to 1. Prices are aligned on the dates common
/// to every symbol; the portfolio return of each period is `sum(w_i * r_i)`
/// and the value curve compounds those returns from 1.0.
///
/// Reported metrics: `total_return`, `annualized_return`,
/// `annualized_volatility`, `sharpe_ratio`, `max_drawdown` (scalars) and
/// `returns`, `value` (series; `value` has one more entry than `returns`).
///
/// # Errors
///
/// `InvalidInput` when a weight has no series or a series has no weight,
/// the weights are invalid, fewer than 3 common dates exist, or any
/// delegated metric rejects its input (for example zero-dispersion returns
/// in the Sharpe ratio).
pub fn portfolio_performance(
    series_by_symbol: &BTreeMap<Symbol, PriceSeries>,
    spec: &PortfolioSpec,
    risk_free_rate: f64,
    periods_per_year: f64,
) -> MetricsResult<MetricResult> {
    check_keys(series_by_symbol, spec)?;
    let weights = spec.normalized()?;

    let symbols: Vec<Symbol> = weights.keys().cloned().collect();
    let series: Vec<&PriceSeries> = symbols
        .iter()
        .filter_map(|s| series_by_symbol.get(s))
        .collect();
    let dates = common_dates(&series);
    if dates.len() < 3 {
        return Err(MetricsError::invalid(format!(
            "portfolio needs at least 3 dates common to all symbols, got {}",
            dates.len()
        )));
    }

    let per_symbol: Vec<Vec<f64>> = aligned_prices(&series, &dates)
        .iter()
        .zip(&symbols)
        .map(|(prices, symbol)| simple_returns(prices, symbol.as_str()))
        .collect::<MetricsResult<_>>()?;
    let weight_vec: Vec<f64> = symbols.iter().map(|s| weights[s]).collect();

    let returns: Vec<f64> = (0..dates.len() - 1)
        .map(|t| {
            per_symbol
                .iter()
                .zip(&weight_vec)
                .map(|(r, w)| w * r[t])
                .sum()
        })
        .collect();

    let mut value = Vec::with_capacity(dates.len());
    value.push(1.0);
    for r in &returns {
        let last = value[value.len() - 1];
        value.push(last * (1.0 + r));
    }

    let result = MetricResult::new(symbols, dates.first().copied(), dates.last().copied())
        .with("total_return", total_return(&returns)?)
        .with("annualized_return", annualized_return(&returns, periods_per_year)?)
        .with("annualized_volatility", annualized_volatility(&returns, periods_per_year)?)
        .with("sharpe_ratio", sharpe_ratio(&returns, risk_free_rate, periods_per_year)?)
        .with("max_drawdown", max_drawdown_values(&value, PORTFOLIO_LABEL)?)
        .with("returns", returns)
        .with("value", value);
    Ok(result)
}

fn check_keys(series_by_symbol: &BTreeMap<Symbol, PriceSeries>, spec: &PortfolioSpec) -> MetricsResult<()> {
    let missing: Vec<&str> = spec
        .symbols()
        .filter(|s| !series_by_symbol.contains_key(*s))
        .map(Symbol::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(MetricsError::invalid(format!(
            "no price series for weighted symbols: {}",
            missing.join(", ")
        )));
    }
    let unweighted: Vec<&str> = series_by_symbol
        .keys()
        .filter(|s| !spec.weights().contains_key(*s))
        .map(Symbol::as_str)
        .collect();
    if !unweighted.is_empty() {
        return Err(MetricsError::invalid(format!(
            "price series supplied without a weight: {}",
            unweighted.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tickerlens_core::Date;

    fn entry(symbol: &str, prices: &[f64]) -> (Symbol, PriceSeries) {
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let s = PriceSeries::from_pairs(
            symbol,
            prices
                .iter()
                .enumerate()
                .map(|(i, p)| (start.add_days(i as i64), *p))
                .collect(),
        )
        .unwrap();
        (s.symbol().clone(), s)
    }

    #[test]
    fn test_two_asset_portfolio() {
        let series: BTreeMap<_, _> = vec![
            entry("A", &[100.0, 110.0, 99.0, 108.9]),
            entry("B", &[50.0, 50.0, 55.0, 55.0]),
        ]
        .into_iter()
        .collect();
        // raw weights 3:1 normalize to 0.75 / 0.25
        let spec = PortfolioSpec::from_pairs([("A", 3.0), ("B", 1.0)]).unwrap();
        let result = portfolio_performance(&series, &spec, 0.0, 252.0).unwrap();

        let returns = result.series("returns").unwrap();
        assert_eq!(returns.len(), 3);
        assert_relative_eq!(returns[0], 0.075, epsilon = 1e-12);
        assert_relative_eq!(returns[1], 0.75 * -0.1 + 0.25 * 0.1, epsilon = 1e-12);
        assert_relative_eq!(returns[2], 0.075, epsilon = 1e-12);

        let value = result.series("value").unwrap();
        assert_eq!(value.len(), 4);
        assert_eq!(value[0], 1.0);
        assert_relative_eq!(
            result.scalar("total_return").unwrap(),
            value[3] - 1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            result.scalar("max_drawdown").unwrap(),
            0.05,
            epsilon = 1e-12
        );
        assert_eq!(result.start, Some(Date::from_ymd(2025, 1, 1).unwrap()));
    }

    #[test]
    fn test_key_mismatch() {
        let series: BTreeMap<_, _> = vec![entry("A", &[1.0, 2.0, 3.0])].into_iter().collect();
        let extra = PortfolioSpec::from_pairs([("A", 0.5), ("B", 0.5)]).unwrap();
        assert!(matches!(
            portfolio_performance(&series, &extra, 0.0, 252.0),
            Err(MetricsError::InvalidInput(_))
        ));

        let series: BTreeMap<_, _> =
            vec![entry("A", &[1.0, 2.0, 3.0]), entry("B", &[1.0, 2.0, 3.0])].into_iter().collect();
        let missing = PortfolioSpec::from_pairs([("A", 1.0)]).unwrap();
        assert!(portfolio_performance(&series, &missing, 0.0, 252.0).is_err());
    }

    #[test]
    fn test_zero_weights_rejected() {
        let series: BTreeMap<_, _> = vec![entry("A", &[1.0, 2.0, 3.0])].into_iter().collect();
        let spec = PortfolioSpec::from_pairs([("A", 0.0)]).unwrap();
        assert!(matches!(
            portfolio_performance(&series, &spec, 0.0, 252.0),
            Err(MetricsError::InvalidInput(_))
        ));
    }
}
