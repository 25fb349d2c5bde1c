//! End-to-end rendering of the report charts.

use tickerlens_charts::{market_dashboard, portfolio_report, technical_analysis, ChartError};
use tickerlens_core::{Date, PriceSeries};

fn series(symbol: &str, len: usize, drift: f64, wobble: f64) -> PriceSeries {
    let start = Date::from_ymd(2024, 1, 2).unwrap();
    let pairs = (0..len)
        .map(|i| {
            let t = i as f64;
            (start.add_days(i as i64), 100.0 * (1.0 + drift).powf(t) + (t * 0.7).sin() * wobble)
        })
        .collect();
    PriceSeries::from_pairs(symbol, pairs).unwrap()
}

fn is_document(svg: &str) -> bool {
    svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\"") && svg.ends_with("</svg>")
}

#[test]
fn test_market_dashboard() {
    let indices = vec![
        series("^GSPC", 120, 0.001, 3.0),
        series("^DJI", 120, 0.0005, 2.0),
        series("^IXIC", 120, 0.0015, 4.0),
    ];
    let svg = market_dashboard(&indices).unwrap();
    assert!(is_document(&svg));
    assert_eq!(svg.matches("<g transform").count(), 3);
    assert!(svg.contains("^GSPC"));
    assert!(svg.contains("overbought"));
}

#[test]
fn test_dashboard_without_rsi_history() {
    let indices = vec![series("^GSPC", 5, 0.001, 1.0)];
    let svg = market_dashboard(&indices).unwrap();
    assert_eq!(svg.matches("<g transform").count(), 2);
    assert!(!svg.contains("RSI"));
}

#[test]
fn test_dashboard_rejects_empty_and_short() {
    assert_eq!(market_dashboard(&[]), Err(ChartError::Empty("market dashboard")));
    let err = market_dashboard(&[series("^DJI", 1, 0.0, 0.0)]).unwrap_err();
    assert!(matches!(err, ChartError::InsufficientData { needed: 2, got: 1, .. }));
    assert_eq!(err.kind(), "invalid_input");
}

#[test]
fn test_portfolio_report() {
    let holdings = vec![
        series("AAPL", 60, 0.002, 2.0),
        series("MSFT", 60, 0.001, 1.5),
        series("NVDA", 60, 0.004, 5.0),
    ];
    let svg = portfolio_report(&holdings).unwrap();
    assert!(is_document(&svg));
    assert!(svg.contains("PORTFOLIO"));
    assert!(svg.contains("Sharpe"));
    // One line per holding plus the portfolio.
    assert_eq!(svg.matches("<polyline").count(), 4);
}

#[test]
fn test_portfolio_report_degenerate_returns() {
    let flat = PriceSeries::from_pairs(
        "CASH",
        (0..10)
            .map(|i| (Date::from_ymd(2024, 1, 1).unwrap().add_days(i), 1.0))
            .collect(),
    )
    .unwrap();
    let err = portfolio_report(&[flat]).unwrap_err();
    assert!(matches!(err, ChartError::Metrics(_)));
}

#[test]
fn test_technical_analysis() {
    let svg = technical_analysis(&series("TSLA", 200, 0.002, 8.0)).unwrap();
    assert!(is_document(&svg));
    assert!(svg.contains("TSLA technical analysis"));
    assert!(svg.contains("MA20"));
    assert!(svg.contains("MA50"));
    assert!(svg.contains("support"));
    assert!(svg.contains("MACD(12,26,9)"));
}

#[test]
fn test_technical_analysis_short_history() {
    // Long enough for MACD but not for the 50 period average.
    let svg = technical_analysis(&series("TSLA", 40, 0.002, 8.0)).unwrap();
    assert!(svg.contains("MA20"));
    assert!(!svg.contains("MA50"));

    let err = technical_analysis(&series("TSLA", 33, 0.002, 8.0)).unwrap_err();
    assert!(matches!(err, ChartError::InsufficientData { needed: 34, got: 33, .. }));
}
