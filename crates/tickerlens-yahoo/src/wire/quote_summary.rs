//! `v10/finance/quoteSummary` earnings modules.

use serde::Deserialize;

use tickerlens_core::{Date, EarningsDate, Symbol};
use tickerlens_traits::{ProviderError, ProviderResult};

use super::{parse_json, ApiError, RawValue};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    #[serde(default)]
    result: Option<Vec<SummaryResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    #[serde(default)]
    earnings_history: Option<EarningsHistory>,
    #[serde(default)]
    calendar_events: Option<CalendarEvents>,
}

#[derive(Debug, Deserialize)]
struct EarningsHistory {
    #[serde(default)]
    history: Vec<HistoryRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryRow {
    #[serde(default)]
    quarter: Option<RawValue>,
    #[serde(default)]
    eps_actual: Option<RawValue>,
    #[serde(default)]
    eps_estimate: Option<RawValue>,
    #[serde(default)]
    surprise_percent: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct CalendarEvents {
    #[serde(default)]
    earnings: Option<CalendarEarnings>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarEarnings {
    #[serde(default)]
    earnings_date: Vec<RawValue>,
    #[serde(default)]
    earnings_average: Option<RawValue>,
}

fn raw(v: Option<RawValue>) -> Option<f64> {
    v.and_then(|r| r.raw)
}

fn date_of(v: Option<RawValue>) -> ProviderResult<Option<Date>> {
    match raw(v) {
        Some(ts) => Ok(Some(Date::from_unix_timestamp(ts as i64, 0)?)),
        None => Ok(None),
    }
}

/// Scheduled and reported earnings, newest first, at most `limit`.
///
/// Upcoming dates carry only the consensus estimate; reported quarters
/// carry estimate, actual and the surprise in percent.
///
/// # Errors
///
/// `NotFound`/`Unavailable` from Yahoo's error object, `Parse` for
/// malformed bodies.
pub fn parse_earnings(body: &str, symbol: &Symbol, limit: usize) -> ProviderResult<Vec<EarningsDate>> {
    let response: SummaryResponse = parse_json(body, "quoteSummary")?;
    if let Some(err) = response.quote_summary.error {
        return Err(err.into_provider_error(symbol.as_str()));
    }
    let result = response
        .quote_summary
        .result
        .and_then(|mut r| (!r.is_empty()).then(|| r.swap_remove(0)))
        .unwrap_or_default();

    let mut out = Vec::new();
    if let Some(earnings) = result.calendar_events.and_then(|c| c.earnings) {
        let estimate = raw(earnings.earnings_average);
        for entry in earnings.earnings_date {
            if let Some(date) = date_of(Some(entry))? {
                out.push(EarningsDate {
                    date,
                    eps_estimate: estimate,
                    eps_actual: None,
                    surprise_pct: None,
                });
            }
        }
    }
    if let Some(history) = result.earnings_history {
        for row in history.history {
            if let Some(date) = date_of(row.quarter)? {
                out.push(EarningsDate {
                    date,
                    eps_estimate: raw(row.eps_estimate),
                    eps_actual: raw(row.eps_actual),
                    surprise_pct: raw(row.surprise_percent).map(|s| s * 100.0),
                });
            }
        }
    }

    out.sort_by(|a, b| b.date.cmp(&a.date));
    out.dedup_by_key(|e| e.date);
    out.truncate(limit);
    if out.is_empty() {
        return Err(ProviderError::NoData(format!("{symbol}: no earnings dates")));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BODY: &str = r#"{"quoteSummary":{"result":[{
        "calendarEvents":{"earnings":{"earningsDate":[{"raw":1745971200,"fmt":"2025-04-30"}],
                                      "earningsAverage":{"raw":1.62}}},
        "earningsHistory":{"history":[
            {"quarter":{"raw":1727654400},"epsActual":{"raw":1.64},"epsEstimate":{"raw":1.6},"surprisePercent":{"raw":0.025}},
            {"quarter":{"raw":1735603200},"epsActual":{"raw":2.4},"epsEstimate":{"raw":2.35},"surprisePercent":{"raw":0.0213}},
            {"quarter":{}}
        ]}
    }],"error":null}}"#;

    #[test]
    fn test_newest_first_with_upcoming() {
        let sym = Symbol::parse("AAPL").unwrap();
        let dates = parse_earnings(BODY, &sym, 12).unwrap();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0].date, Date::from_ymd(2025, 4, 30).unwrap());
        assert_eq!(dates[0].eps_actual, None);
        assert_eq!(dates[1].date, Date::from_ymd(2024, 12, 31).unwrap());
        assert_relative_eq!(dates[1].surprise_pct.unwrap(), 2.13, epsilon = 1e-9);
    }

    #[test]
    fn test_limit() {
        let sym = Symbol::parse("AAPL").unwrap();
        assert_eq!(parse_earnings(BODY, &sym, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_error_object() {
        let sym = Symbol::parse("NOPE").unwrap();
        let body = r#"{"quoteSummary":{"result":null,"error":{"code":"Not Found","description":"Quote not found for symbol: NOPE"}}}"#;
        assert!(matches!(parse_earnings(body, &sym, 4), Err(ProviderError::NotFound(_))));
    }
}
