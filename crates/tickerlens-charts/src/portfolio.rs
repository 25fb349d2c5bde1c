//! Portfolio report: holdings against their equal-weight combination.

use std::collections::BTreeMap;

use tickerlens_core::{PortfolioSpec, PriceSeries, Symbol};
use tickerlens_metrics::{common_dates, portfolio_performance, MetricsError, TRADING_DAYS_PER_YEAR};

use crate::dashboard::require_len;
use crate::error::{ChartError, ChartResult};
use crate::svg::{color, Figure, Guide, Line, Panel, ValueFormat, ACCENT_COLOR};

const PORTFOLIO_LABEL: &str = "PORTFOLIO";

/// Renders the portfolio report for daily price series.
///
/// The top panel shows the growth of one unit in each holding and in the
/// equal-weight portfolio over the common dates; the bottom panel the
/// total return of each. The portfolio's Sharpe ratio (zero risk-free
/// rate) and maximum drawdown go in the panel title.
///
/// # Errors
///
/// `Empty` without holdings, `InsufficientData` for a holding with fewer
/// than three prices, and any error of the portfolio computation (too few
/// common dates, zero-dispersion returns).
pub fn portfolio_report(holdings: &[PriceSeries]) -> ChartResult<String> {
    if holdings.is_empty() {
        return Err(ChartError::Empty("portfolio report"));
    }
    for series in holdings {
        require_len(series, 3)?;
    }

    let by_symbol: BTreeMap<Symbol, PriceSeries> = holdings
        .iter()
        .map(|s| (s.symbol().clone(), s.clone()))
        .collect();
    let symbols: Vec<Symbol> = by_symbol.keys().cloned().collect();
    let spec = PortfolioSpec::equal_weight(&symbols).map_err(MetricsError::from)?;
    let performance = portfolio_performance(&by_symbol, &spec, 0.0, TRADING_DAYS_PER_YEAR)?;

    let refs: Vec<&PriceSeries> = by_symbol.values().collect();
    let dates = common_dates(&refs);

    let mut lines: Vec<Line> = by_symbol
        .values()
        .enumerate()
        .map(|(i, series)| {
            let prices = series.restricted_to(&dates).prices();
            let base = prices[0];
            Line::new(
                series.symbol().as_str(),
                color(i),
                prices.iter().enumerate().map(|(k, p)| (k, p / base)).collect(),
            )
        })
        .collect();
    let value = performance.series("value").unwrap_or_default();
    lines.push(
        Line::new(
            PORTFOLIO_LABEL,
            "#000000",
            value.iter().copied().enumerate().collect(),
        )
        .dashed()
        .bold(),
    );

    let mut labels: Vec<String> = symbols.iter().map(Symbol::to_string).collect();
    let mut totals: Vec<f64> = by_symbol
        .values()
        .map(|s| {
            let p = s.restricted_to(&dates).prices();
            p[p.len() - 1] / p[0] - 1.0
        })
        .collect();
    labels.push(PORTFOLIO_LABEL.to_string());
    totals.push(performance.scalar("total_return").unwrap_or(f64::NAN));

    let sharpe = performance.scalar("sharpe_ratio").unwrap_or(f64::NAN);
    let drawdown = performance.scalar("max_drawdown").unwrap_or(f64::NAN);

    let figure = Figure::new(format!("Portfolio report {} to {}", dates[0], dates[dates.len() - 1]))
        .panel(Panel::Lines {
            title: "Growth of 1".to_string(),
            dates,
            lines,
            guides: vec![Guide::new(1.0, ACCENT_COLOR, None)],
            format: ValueFormat::Number,
        })
        .panel(Panel::Bars {
            title: format!(
                "Total return (equal weight: Sharpe {sharpe:.2}, max drawdown {:.1}%)",
                drawdown * 100.0
            ),
            labels,
            values: totals,
            guides: Vec::new(),
            format: ValueFormat::Percent,
        });

    Ok(figure.render())
}
