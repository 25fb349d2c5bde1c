//! Date alignment across several price series.

use tickerlens_core::{Date, PriceSeries};

/// Dates present in every series, ascending.
///
/// No filling or interpolation: a date missing from any one series is
/// dropped from the result.
pub fn common_dates(series: &[&PriceSeries]) -> Vec<Date> {
    let Some((first, rest)) = series.split_first() else {
        return Vec::new();
    };
    first
        .points()
        .iter()
        .map(|p| p.date)
        .filter(|date| rest.iter().all(|s| s.price_on(*date).is_some()))
        .collect()
}

/// Prices of each series on `dates`, in the order of `series`.
///
/// `dates` must come from [`common_dates`] over the same series, so every
/// lookup succeeds.
pub(crate) fn aligned_prices(series: &[&PriceSeries], dates: &[Date]) -> Vec<Vec<f64>> {
    series
        .iter()
        .map(|s| s.restricted_to(dates).prices())
        .collect()
}
