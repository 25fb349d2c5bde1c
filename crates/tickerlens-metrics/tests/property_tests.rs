//! Property-based tests for metric invariants.
//!
//! - Returns reproduce the price ratios
//! - Drawdown stays in [0, 1] and is 0 for non-decreasing prices
//! - RSI stays in [0, 100]
//! - Correlation matrices are symmetric with a unit diagonal
//! - Repeated evaluation is bit-identical

use std::collections::BTreeMap;

use proptest::prelude::*;
use tickerlens_core::{Date, PortfolioSpec, PriceSeries, Symbol};
use tickerlens_metrics::prelude::*;

// =============================================================================
// GENERATORS
// =============================================================================

fn build_series(symbol: &str, start_offset: i64, prices: &[f64]) -> PriceSeries {
    let start = Date::from_ymd(2024, 1, 1).unwrap().add_days(start_offset);
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

fn positive_prices(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..1_000.0, min_len..max_len)
}

proptest! {
    #[test]
    fn returns_match_price_ratios(prices in positive_prices(2, 80)) {
        let series = build_series("P", 0, &prices);
        let r = compute_returns(&series).unwrap();
        prop_assert_eq!(r.len(), prices.len() - 1);
        for i in 0..r.len() {
            prop_assert!((r.values[i] - (prices[i + 1] / prices[i] - 1.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn drawdown_is_a_fraction(prices in positive_prices(1, 80)) {
        let dd = max_drawdown(&build_series("P", 0, &prices)).unwrap();
        prop_assert!((0.0..=1.0).contains(&dd));
    }

    #[test]
    fn drawdown_of_sorted_prices_is_zero(mut prices in positive_prices(1, 60)) {
        prices.sort_by(f64::total_cmp);
        prop_assert_eq!(max_drawdown(&build_series("P", 0, &prices)).unwrap(), 0.0);
    }

    #[test]
    fn rsi_is_bounded(prices in positive_prices(16, 80), window in 1usize..15) {
        let out = rsi(&build_series("P", 0, &prices), window).unwrap();
        prop_assert_eq!(out.len(), prices.len() - window);
        prop_assert!(out.iter().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn moving_average_length(prices in positive_prices(1, 60), window in 1usize..20) {
        let series = build_series("P", 0, &prices);
        match moving_average(&series, window) {
            Ok(ma) => prop_assert_eq!(ma.len(), prices.len() - window + 1),
            Err(_) => prop_assert!(window > prices.len()),
        }
    }

    #[test]
    fn correlation_is_symmetric(
        a in positive_prices(10, 40),
        b in positive_prices(10, 40),
        c in positive_prices(10, 40),
        offset in 0i64..5,
    ) {
        let map: BTreeMap<Symbol, PriceSeries> = [
            build_series("A", 0, &a),
            build_series("B", offset, &b),
            build_series("C", 0, &c),
        ]
        .into_iter()
        .map(|s| (s.symbol().clone(), s))
        .collect();

        if let Ok(m) = correlation_matrix(&map) {
            let n = m.len();
            for i in 0..n {
                prop_assert_eq!(m.values()[i][i], 1.0);
                for j in 0..n {
                    prop_assert_eq!(m.values()[i][j].to_bits(), m.values()[j][i].to_bits());
                    prop_assert!((-1.0..=1.0).contains(&m.values()[i][j]));
                }
            }
        }
    }

    #[test]
    fn var_is_within_sample_range(returns in prop::collection::vec(-0.2f64..0.2, 1..100), confidence in 0.5f64..0.99) {
        let var = value_at_risk(&returns, confidence).unwrap();
        let min = returns.iter().copied().fold(f64::INFINITY, f64::min);
        let max = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(var >= min - 1e-15 && var <= max + 1e-15);
        prop_assert!(expected_shortfall(&returns, confidence).unwrap() <= var + 1e-15);
    }

    #[test]
    fn portfolio_is_deterministic(a in positive_prices(5, 30), b in positive_prices(5, 30), w in 0.05f64..0.95) {
        let map: BTreeMap<Symbol, PriceSeries> = [build_series("A", 0, &a), build_series("B", 0, &b)]
            .into_iter()
            .map(|s| (s.symbol().clone(), s))
            .collect();
        let spec = PortfolioSpec::from_pairs([("A", w), ("B", 1.0 - w)]).unwrap();
        let first = portfolio_performance(&map, &spec, 0.02, 252.0);
        let second = portfolio_performance(&map, &spec, 0.02, 252.0);
        prop_assert_eq!(first, second);
    }
}
