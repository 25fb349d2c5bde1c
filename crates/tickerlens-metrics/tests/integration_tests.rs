//! End-to-end metric calculations over small hand-checked series.

use std::collections::BTreeMap;

use approx::assert_relative_eq;
use tickerlens_core::{Date, PortfolioSpec, PriceSeries, Symbol};
use tickerlens_metrics::prelude::*;

fn daily(symbol: &str, prices: &[f64]) -> PriceSeries {
    let start = Date::from_ymd(2025, 1, 2).unwrap();
    PriceSeries::from_pairs(
        symbol,
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| (start.add_days(i as i64), *p))
            .collect(),
    )
    .unwrap()
}

#[test]
fn test_reference_series() {
    let series = daily("REF", &[10.0, 11.0, 9.0, 12.0]);

    let returns = compute_returns(&series).unwrap();
    assert_relative_eq!(returns.values[0], 0.1, epsilon = 1e-9);
    assert_relative_eq!(returns.values[1], -0.181_818_181_8, epsilon = 1e-9);
    assert_relative_eq!(returns.values[2], 0.333_333_333_3, epsilon = 1e-9);

    assert_relative_eq!(max_drawdown(&series).unwrap(), 0.181_818_181_8, epsilon = 1e-9);
    assert_relative_eq!(
        max_drawdown(&daily("DD", &[100.0, 50.0, 120.0])).unwrap(),
        0.5
    );
}

#[test]
fn test_increasing_series_invariants() {
    let prices: Vec<f64> = (1..=40).map(|i| 100.0 + f64::from(i)).collect();
    let series = daily("UP", &prices);
    assert_eq!(max_drawdown(&series).unwrap(), 0.0);
    assert!(rsi(&series, DEFAULT_RSI_WINDOW).unwrap().iter().all(|v| *v == 100.0));
    let m = macd(&series, DEFAULT_MACD_FAST, DEFAULT_MACD_SLOW, DEFAULT_MACD_SIGNAL).unwrap();
    assert_eq!(m.len(), 40 - 33);
}

#[test]
fn test_identical_returns_reject_sharpe() {
    assert!(matches!(
        sharpe_ratio(&[0.001; 30], 0.0, TRADING_DAYS_PER_YEAR),
        Err(MetricsError::InvalidInput(_))
    ));
}

#[test]
fn test_self_correlation() {
    let a = daily("AAPL", &[1.0, 1.2, 1.1, 1.3, 1.25]);
    let b = daily("MSFT", &[2.0, 2.1, 2.3, 2.2, 2.4]);
    let map: BTreeMap<Symbol, PriceSeries> = [a, b]
        .into_iter()
        .map(|s| (s.symbol().clone(), s))
        .collect();
    let m = correlation_matrix(&map).unwrap();
    for (i, row) in m.values().iter().enumerate() {
        assert_eq!(row[i], 1.0);
    }
    assert_eq!(m.values()[0][1], m.values()[1][0]);

    let json = serde_json::to_value(&m).unwrap();
    assert_eq!(json["AAPL"]["AAPL"], serde_json::json!(1.0));
}

#[test]
fn test_portfolio_matches_single_asset() {
    let series = daily("SPY", &[100.0, 101.0, 99.5, 102.0, 103.5, 101.0]);
    let map: BTreeMap<Symbol, PriceSeries> =
        [(series.symbol().clone(), series.clone())].into_iter().collect();
    let spec = PortfolioSpec::from_pairs([("SPY", 2.0)]).unwrap();
    let result = portfolio_performance(&map, &spec, 0.0, TRADING_DAYS_PER_YEAR).unwrap();

    let returns = compute_returns(&series).unwrap();
    assert_eq!(result.series("returns").unwrap(), returns.as_slice());
    assert_relative_eq!(
        result.scalar("sharpe_ratio").unwrap(),
        sharpe_ratio(returns.as_slice(), 0.0, TRADING_DAYS_PER_YEAR).unwrap()
    );
    assert_relative_eq!(
        result.scalar("max_drawdown").unwrap(),
        max_drawdown(&series).unwrap(),
        epsilon = 1e-12
    );
    assert_relative_eq!(result.scalar("total_return").unwrap(), 0.01, epsilon = 1e-12);
}

#[test]
fn test_portfolio_aligns_on_common_dates() {
    let d = |day| Date::from_ymd(2025, 3, day).unwrap();
    let a = PriceSeries::from_pairs("A", vec![(d(3), 10.0), (d(4), 11.0), (d(5), 12.0), (d(6), 11.0)])
        .unwrap();
    let b = PriceSeries::from_pairs("B", vec![(d(4), 20.0), (d(5), 21.0), (d(6), 22.0), (d(7), 23.0)])
        .unwrap();
    let map: BTreeMap<Symbol, PriceSeries> = [a, b]
        .into_iter()
        .map(|s| (s.symbol().clone(), s))
        .collect();
    let spec = PortfolioSpec::from_pairs([("A", 0.5), ("B", 0.5)]).unwrap();
    let result = portfolio_performance(&map, &spec, 0.0, 252.0).unwrap();
    assert_eq!(result.start, Some(d(4)));
    assert_eq!(result.end, Some(d(6)));
    assert_eq!(result.series("value").unwrap().len(), 3);
}

#[test]
fn test_beta_and_var_on_shared_returns() {
    let market = [0.01, -0.005, 0.007, -0.012, 0.004, 0.009];
    let asset: Vec<f64> = market.iter().map(|r| 2.0 * r).collect();
    assert_relative_eq!(beta(&asset, &market).unwrap(), 2.0, epsilon = 1e-12);

    let hist = value_at_risk(&market, DEFAULT_VAR_CONFIDENCE).unwrap();
    let param = parametric_var(&market, DEFAULT_VAR_CONFIDENCE).unwrap();
    assert!(hist < 0.0 && param < 0.0);
}
