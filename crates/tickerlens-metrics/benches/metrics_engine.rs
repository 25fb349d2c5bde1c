//! Benchmarks for the metrics engine.
//!
//! Run with: cargo bench -p tickerlens-metrics

use std::collections::BTreeMap;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tickerlens_core::{Date, PortfolioSpec, PriceSeries, Symbol};
use tickerlens_metrics::prelude::*;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn synthetic_series(symbol: &str, len: usize, seed: u64) -> PriceSeries {
    let start = Date::from_ymd(2015, 1, 2).unwrap();
    let mut state = seed;
    let mut price = 100.0;
    let pairs = (0..len)
        .map(|i| {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let shock = ((state >> 33) as f64 / (1u64 << 31) as f64 - 0.5) * 0.04;
            price *= 1.0 + shock;
            (start.add_days(i as i64), price)
        })
        .collect();
    PriceSeries::from_pairs(symbol, pairs).unwrap()
}

fn universe(n: usize, len: usize) -> BTreeMap<Symbol, PriceSeries> {
    (0..n)
        .map(|i| {
            let s = synthetic_series(&format!("S{i:03}"), len, i as u64 + 1);
            (s.symbol().clone(), s)
        })
        .collect()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_single_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_series");
    for len in [252usize, 2_520] {
        let series = synthetic_series("SPY", len, 7);
        let returns = compute_returns(&series).unwrap().values;
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("rsi", len), &series, |b, s| {
            b.iter(|| rsi(black_box(s), DEFAULT_RSI_WINDOW))
        });
        group.bench_with_input(BenchmarkId::new("macd", len), &series, |b, s| {
            b.iter(|| macd(black_box(s), 12, 26, 9))
        });
        group.bench_with_input(BenchmarkId::new("max_drawdown", len), &series, |b, s| {
            b.iter(|| max_drawdown(black_box(s)))
        });
        group.bench_with_input(BenchmarkId::new("value_at_risk", len), &returns, |b, r| {
            b.iter(|| value_at_risk(black_box(r), 0.99))
        });
    }
    group.finish();
}

fn bench_cross_section(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_section");
    for n in [5usize, 25] {
        let map = universe(n, 756);
        let symbols: Vec<Symbol> = map.keys().cloned().collect();
        let spec = PortfolioSpec::equal_weight(&symbols).unwrap();

        group.bench_with_input(BenchmarkId::new("correlation_matrix", n), &map, |b, m| {
            b.iter(|| correlation_matrix(black_box(m)))
        });
        group.bench_with_input(BenchmarkId::new("portfolio_performance", n), &map, |b, m| {
            b.iter(|| portfolio_performance(black_box(m), &spec, 0.02, TRADING_DAYS_PER_YEAR))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_series, bench_cross_section);
criterion_main!(benches);
