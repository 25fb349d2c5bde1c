//! `ws/fundamentals-timeseries` payloads.
//!
//! The endpoint takes a comma-separated `type` list such as
//! `annualTotalRevenue,annualNetIncome` and answers one result per type,
//! with the values under a key named after the type itself.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use tickerlens_core::{Date, FinancialStatement, LineItem, StatementFrequency, StatementKind, Symbol};
use tickerlens_traits::{ProviderError, ProviderResult};

use super::{parse_json, ApiError, RawValue};

const INCOME_LINES: &[&str] = &[
    "TotalRevenue",
    "CostOfRevenue",
    "GrossProfit",
    "ResearchAndDevelopment",
    "SellingGeneralAndAdministration",
    "OperatingExpense",
    "OperatingIncome",
    "InterestExpense",
    "PretaxIncome",
    "TaxProvision",
    "NetIncome",
    "EBIT",
    "EBITDA",
    "BasicEPS",
    "DilutedEPS",
    "DilutedAverageShares",
];

const CASHFLOW_LINES: &[&str] = &[
    "OperatingCashFlow",
    "InvestingCashFlow",
    "FinancingCashFlow",
    "FreeCashFlow",
    "CapitalExpenditure",
    "DepreciationAndAmortization",
    "StockBasedCompensation",
    "ChangeInWorkingCapital",
    "CashDividendsPaid",
    "RepurchaseOfCapitalStock",
    "EndCashPosition",
];

/// The `type` query value for a statement, e.g. `annualTotalRevenue,...`.
pub fn statement_types(kind: StatementKind, frequency: StatementFrequency) -> String {
    let lines = match kind {
        StatementKind::Income => INCOME_LINES,
        StatementKind::Cashflow => CASHFLOW_LINES,
    };
    let prefix = frequency.series_prefix();
    lines
        .iter()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    timeseries: TimeseriesEnvelope,
}

#[derive(Debug, Deserialize)]
struct TimeseriesEnvelope {
    #[serde(default)]
    result: Vec<TimeseriesResult>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesResult {
    meta: TimeseriesMeta,
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesMeta {
    #[serde(rename = "type", default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeseriesEntry {
    as_of_date: String,
    reported_value: RawValue,
}

/// Builds a statement from a timeseries response.
///
/// Line names drop the frequency prefix (`annualNetIncome` becomes
/// `NetIncome`); null entries and lines with no values are left out.
///
/// # Errors
///
/// `NoData` when no line has a value, `Parse` for malformed bodies.
pub fn parse_statement(
    body: &str,
    symbol: &Symbol,
    kind: StatementKind,
    frequency: StatementFrequency,
) -> ProviderResult<FinancialStatement> {
    let response: TimeseriesResponse = parse_json(body, "fundamentals")?;
    if let Some(err) = response.timeseries.error {
        return Err(err.into_provider_error(symbol.as_str()));
    }

    let prefix = frequency.series_prefix();
    let mut line_items: BTreeMap<String, Vec<LineItem>> = BTreeMap::new();
    for result in response.timeseries.result {
        let Some(type_name) = result.meta.types.first() else {
            continue;
        };
        let Some(raw_entries) = result.rest.get(type_name) else {
            continue;
        };
        let entries: Vec<Option<TimeseriesEntry>> = serde_json::from_value(raw_entries.clone())
            .map_err(|e| ProviderError::Parse(format!("yahoo fundamentals {type_name}: {e}")))?;

        let mut items = Vec::new();
        for entry in entries.into_iter().flatten() {
            let Some(value) = entry.reported_value.raw else {
                continue;
            };
            items.push(LineItem {
                as_of: Date::parse(&entry.as_of_date)?,
                value,
            });
        }
        if items.is_empty() {
            continue;
        }
        items.sort_by_key(|i| i.as_of);
        let line = type_name.strip_prefix(prefix).unwrap_or(type_name).to_string();
        line_items.insert(line, items);
    }

    if line_items.is_empty() {
        return Err(ProviderError::NoData(format!(
            "{symbol}: no {frequency} {kind} data"
        )));
    }
    Ok(FinancialStatement {
        symbol: symbol.clone(),
        kind,
        frequency,
        line_items,
    })
}
