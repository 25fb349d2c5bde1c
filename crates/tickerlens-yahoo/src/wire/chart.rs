//! `v8/finance/chart` payloads.

use std::collections::BTreeMap;

use serde::Deserialize;

use tickerlens_core::{Date, DividendEvent, PricePoint, PriceSeries, Quote, Symbol};
use tickerlens_traits::{ProviderError, ProviderResult};

use super::{parse_json, ApiError};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

/// One symbol's chart payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
    #[serde(default)]
    events: Events,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    regular_market_time: Option<i64>,
    #[serde(default)]
    chart_previous_close: Option<f64>,
    #[serde(default)]
    previous_close: Option<f64>,
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Events {
    #[serde(default)]
    dividends: BTreeMap<String, DividendRow>,
}

#[derive(Debug, Clone, Deserialize)]
struct DividendRow {
    amount: f64,
    date: i64,
}

/// Decodes a chart response, surfacing Yahoo's embedded error object.
///
/// # Errors
///
/// `NotFound` for unknown symbols, `Parse` for malformed bodies.
pub fn parse_chart(body: &str, symbol: &Symbol) -> ProviderResult<ChartResult> {
    let response: ChartResponse = parse_json(body, "chart")?;
    if let Some(err) = response.chart.error {
        return Err(err.into_provider_error(symbol.as_str()));
    }
    response
        .chart
        .result
        .and_then(|mut r| (!r.is_empty()).then(|| r.swap_remove(0)))
        .ok_or_else(|| ProviderError::NotFound(format!("{symbol}: empty chart result")))
}

/// Closing prices, dated in exchange-local time.
///
/// Null closes (halted sessions, the still-open bar) are skipped. When two
/// bars land on one date the later one wins.
///
/// # Errors
///
/// `NoData` when no close survives.
pub fn chart_series(symbol: &Symbol, chart: &ChartResult) -> ProviderResult<PriceSeries> {
    let closes = chart
        .indicators
        .quote
        .first()
        .map(|q| q.close.as_slice())
        .unwrap_or_default();

    let mut by_date: BTreeMap<Date, f64> = BTreeMap::new();
    for (ts, close) in chart.timestamp.iter().zip(closes) {
        let Some(price) = close.filter(|p| p.is_finite()) else {
            continue;
        };
        let date = Date::from_unix_timestamp(*ts, chart.meta.gmtoffset)?;
        by_date.insert(date, price);
    }
    if by_date.is_empty() {
        return Err(ProviderError::NoData(format!("{symbol}: no closing prices in range")));
    }

    let points = by_date
        .into_iter()
        .map(|(date, price)| PricePoint { date, price })
        .collect();
    Ok(PriceSeries::new(symbol.clone(), points)?)
}

/// Latest price from chart metadata, falling back to the last close.
///
/// # Errors
///
/// `NoData` when neither is present.
pub fn chart_quote(symbol: &Symbol, chart: &ChartResult) -> ProviderResult<Quote> {
    let last_close = || {
        chart
            .indicators
            .quote
            .first()
            .and_then(|q| q.close.iter().rev().find_map(|c| *c))
    };
    let price = chart
        .meta
        .regular_market_price
        .or_else(last_close)
        .ok_or_else(|| ProviderError::NoData(format!("{symbol}: no current price")))?;

    Ok(Quote {
        symbol: symbol.clone(),
        price,
        currency: chart.meta.currency.clone(),
        previous_close: chart.meta.previous_close.or(chart.meta.chart_previous_close),
        timestamp: chart.meta.regular_market_time,
    })
}

/// Dividend events, ascending by ex-date.
///
/// # Errors
///
/// `Parse` for an out-of-range timestamp.
pub fn chart_dividends(chart: &ChartResult) -> ProviderResult<Vec<DividendEvent>> {
    let mut events = chart
        .events
        .dividends
        .values()
        .map(|row| {
            Ok(DividendEvent {
                date: Date::from_unix_timestamp(row.date, chart.meta.gmtoffset)?,
                amount: row.amount,
            })
        })
        .collect::<ProviderResult<Vec<_>>>()?;
    events.sort_by_key(|e| e.date);
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-01-02 and 2025-01-03 14:30 UTC (09:30 New York), then a null bar.
    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "symbol": "AAPL",
                    "regularMarketPrice": 243.36,
                    "regularMarketTime": 1735938000,
                    "chartPreviousClose": 250.42,
                    "gmtoffset": -18000
                },
                "timestamp": [1735828200, 1735914600, 1736001000],
                "indicators": { "quote": [{ "close": [243.85, 243.36, null] }] },
                "events": { "dividends": {
                    "1731335400": { "amount": 0.25, "date": 1731335400 },
                    "1723469400": { "amount": 0.25, "date": 1723469400 }
                } }
            }],
            "error": null
        }
    }"#;

    fn aapl() -> Symbol {
        Symbol::parse("AAPL").unwrap()
    }

    #[test]
    fn test_series_skips_nulls_and_uses_local_dates() {
        let chart = parse_chart(CHART, &aapl()).unwrap();
        let series = chart_series(&aapl(), &chart).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].date, Date::from_ymd(2025, 1, 2).unwrap());
        assert_eq!(series.points()[1].price, 243.36);
    }

    #[test]
    fn test_quote_and_dividends() {
        let chart = parse_chart(CHART, &aapl()).unwrap();
        let quote = chart_quote(&aapl(), &chart).unwrap();
        assert_eq!(quote.price, 243.36);
        assert_eq!(quote.currency.as_deref(), Some("USD"));
        assert_eq!(quote.previous_close, Some(250.42));

        let divs = chart_dividends(&chart).unwrap();
        assert_eq!(divs.len(), 2);
        assert!(divs[0].date < divs[1].date);
        assert_eq!(divs[1].date, Date::from_ymd(2024, 11, 11).unwrap());
    }

    #[test]
    fn test_embedded_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart(body, &Symbol::parse("ZZZZZ").unwrap()).unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(ref m) if m.contains("delisted")));
    }

    #[test]
    fn test_all_null_closes() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},"timestamp":[1735828200],
            "indicators":{"quote":[{"close":[null]}]}}],"error":null}}"#;
        let chart = parse_chart(body, &aapl()).unwrap();
        assert!(matches!(chart_series(&aapl(), &chart), Err(ProviderError::NoData(_))));
        assert!(matches!(chart_quote(&aapl(), &chart), Err(ProviderError::NoData(_))));
    }
}
