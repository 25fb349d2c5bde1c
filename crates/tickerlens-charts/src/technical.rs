//! Single-symbol technical analysis chart.

use tickerlens_core::PriceSeries;
use tickerlens_metrics::{
    macd, moving_average, rsi, support_resistance, DEFAULT_MACD_FAST, DEFAULT_MACD_SIGNAL,
    DEFAULT_MACD_SLOW, DEFAULT_RSI_WINDOW, RSI_OVERBOUGHT, RSI_OVERSOLD,
};

use crate::dashboard::require_len;
use crate::error::ChartResult;
use crate::svg::{color, Figure, Guide, Line, Panel, ValueFormat, ACCENT_COLOR};

const SHORT_MA: usize = 20;
const LONG_MA: usize = 50;
const LEVELS_LOOKBACK: usize = 60;

/// Renders price, RSI and MACD panels for one symbol.
///
/// The price panel carries the 20 and 50 period moving averages (each
/// only once the series is long enough) and the support and resistance
/// of the last 60 closes. Indicator lines are right-aligned with the
/// dates they belong to.
///
/// # Errors
///
/// `InsufficientData` when the series is shorter than the MACD look-back
/// (`slow + signal - 1` = 34 prices).
pub fn technical_analysis(series: &PriceSeries) -> ChartResult<String> {
    require_len(series, DEFAULT_MACD_SLOW + DEFAULT_MACD_SIGNAL - 1)?;

    let dates = series.dates();
    let n = dates.len();
    let symbol = series.symbol().as_str();

    let mut price_lines = vec![Line::trailing(symbol, color(0), &series.prices(), n).bold()];
    for (i, window) in [SHORT_MA, LONG_MA].into_iter().enumerate() {
        if n >= window {
            let ma = moving_average(series, window)?;
            price_lines.push(Line::trailing(format!("MA{window}"), color(i + 1), &ma, n));
        }
    }
    let levels = support_resistance(series, LEVELS_LOOKBACK.min(n))?;
    let level_guides = vec![
        Guide::new(levels.resistance, color(2), Some(format!("resistance {:.2}", levels.resistance))),
        Guide::new(levels.support, color(3), Some(format!("support {:.2}", levels.support))),
    ];

    let rsi_values = rsi(series, DEFAULT_RSI_WINDOW)?;
    let macd = macd(series, DEFAULT_MACD_FAST, DEFAULT_MACD_SLOW, DEFAULT_MACD_SIGNAL)?;

    let figure = Figure::new(format!("{symbol} technical analysis"))
        .panel(Panel::Lines {
            title: format!("Price, last {:.2}", levels.last),
            dates: dates.clone(),
            lines: price_lines,
            guides: level_guides,
            format: ValueFormat::Number,
        })
        .panel(Panel::Lines {
            title: format!("RSI({DEFAULT_RSI_WINDOW})"),
            dates: dates.clone(),
            lines: vec![Line::trailing("RSI", color(4), &rsi_values, n)],
            guides: vec![
                Guide::new(RSI_OVERBOUGHT, color(2), Some("70".to_string())),
                Guide::new(RSI_OVERSOLD, color(3), Some("30".to_string())),
            ],
            format: ValueFormat::Number,
        })
        .panel(Panel::Lines {
            title: format!("MACD({DEFAULT_MACD_FAST},{DEFAULT_MACD_SLOW},{DEFAULT_MACD_SIGNAL})"),
            dates,
            lines: vec![
                Line::trailing("MACD", color(0), &macd.macd_line, n),
                Line::trailing("signal", color(1), &macd.signal_line, n).dashed(),
            ],
            guides: vec![Guide::new(0.0, ACCENT_COLOR, None)],
            format: ValueFormat::Number,
        });

    Ok(figure.render())
}
