//! Market dashboard: how a set of indices moved over one window.

use tickerlens_core::PriceSeries;
use tickerlens_metrics::{common_dates, rsi, DEFAULT_RSI_WINDOW, RSI_OVERBOUGHT, RSI_OVERSOLD};

use crate::error::{ChartError, ChartResult};
use crate::svg::{color, Figure, Guide, Line, Panel, ValueFormat, ACCENT_COLOR};

/// Renders the market dashboard.
///
/// Three panels: every index rebased to 100 on the first common date,
/// the change of each index over its own series, and the latest RSI of
/// each index against the overbought/oversold bands. The RSI panel is
/// left out when no index has enough history for it.
///
/// # Errors
///
/// `Empty` without indices, `InsufficientData` when an index or the
/// common date range has fewer than two prices.
pub fn market_dashboard(indices: &[PriceSeries]) -> ChartResult<String> {
    if indices.is_empty() {
        return Err(ChartError::Empty("market dashboard"));
    }
    for series in indices {
        require_len(series, 2)?;
    }

    let refs: Vec<&PriceSeries> = indices.iter().collect();
    let dates = common_dates(&refs);
    if dates.len() < 2 {
        return Err(ChartError::InsufficientData {
            symbol: "common dates".to_string(),
            needed: 2,
            got: dates.len(),
        });
    }

    let lines = indices
        .iter()
        .enumerate()
        .map(|(i, series)| {
            let aligned = series.restricted_to(&dates).prices();
            let base = aligned[0];
            let points = aligned
                .iter()
                .enumerate()
                .map(|(k, p)| (k, p / base * 100.0))
                .collect();
            Line::new(series.symbol().as_str(), color(i), points)
        })
        .collect();

    let labels: Vec<String> = indices.iter().map(|s| s.symbol().to_string()).collect();
    let changes = indices.iter().map(period_change).collect();

    let mut figure = Figure::new(format!("Market dashboard {} to {}", dates[0], dates[dates.len() - 1]))
        .panel(Panel::Lines {
            title: "Rebased to 100".to_string(),
            dates,
            lines,
            guides: vec![Guide::new(100.0, ACCENT_COLOR, None)],
            format: ValueFormat::Number,
        })
        .panel(Panel::Bars {
            title: "Period change".to_string(),
            labels,
            values: changes,
            guides: Vec::new(),
            format: ValueFormat::Percent,
        });

    let readings: Vec<(String, f64)> = indices
        .iter()
        .filter_map(|s| {
            let values = rsi(s, DEFAULT_RSI_WINDOW).ok()?;
            values.last().map(|v| (s.symbol().to_string(), *v))
        })
        .collect();
    if !readings.is_empty() {
        let (labels, values) = readings.into_iter().unzip();
        figure = figure.panel(Panel::Bars {
            title: format!("RSI({DEFAULT_RSI_WINDOW}) sentiment"),
            labels,
            values,
            guides: vec![
                Guide::new(RSI_OVERBOUGHT, color(2), Some("overbought".to_string())),
                Guide::new(RSI_OVERSOLD, color(3), Some("oversold".to_string())),
            ],
            format: ValueFormat::Number,
        });
    }

    Ok(figure.render())
}

fn period_change(series: &PriceSeries) -> f64 {
    let prices = series.prices();
    match (prices.first(), prices.last()) {
        (Some(first), Some(last)) if *first != 0.0 => last / first - 1.0,
        _ => f64::NAN,
    }
}

pub(crate) fn require_len(series: &PriceSeries, needed: usize) -> ChartResult<()> {
    if series.len() < needed {
        return Err(ChartError::InsufficientData {
            symbol: series.symbol().to_string(),
            needed,
            got: series.len(),
        });
    }
    Ok(())
}
