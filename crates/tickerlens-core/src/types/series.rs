//! Price and return time series.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Date, Symbol};
use crate::error::{CoreError, CoreResult};

/// A single dated price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observation date.
    pub date: Date,
    /// Closing price.
    pub price: f64,
}

/// An ordered sequence of prices for one symbol.
///
/// Invariants, enforced by every constructor:
/// - dates strictly ascending (no duplicates)
/// - every price finite
///
/// Positivity is not enforced here; operations that divide by a price
/// reject non-positive values themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: Symbol,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Creates a series from points that must already be in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSeries` on a non-finite price or on
    /// dates that are not strictly ascending.
    pub fn new(symbol: Symbol, points: Vec<PricePoint>) -> CoreResult<Self> {
        for (i, point) in points.iter().enumerate() {
            if !point.price.is_finite() {
                return Err(CoreError::invalid_series(
                    symbol.as_str(),
                    format!("non-finite price on {}", point.date),
                ));
            }
            if i > 0 && points[i - 1].date >= point.date {
                return Err(CoreError::invalid_series(
                    symbol.as_str(),
                    format!(
                        "dates not strictly ascending at {} (after {})",
                        point.date,
                        points[i - 1].date
                    ),
                ));
            }
        }
        Ok(Self { symbol, points })
    }

    /// Creates a series from `(date, price)` pairs in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid symbol or a series invariant violation.
    pub fn from_pairs(symbol: &str, pairs: Vec<(Date, f64)>) -> CoreResult<Self> {
        let symbol = Symbol::parse(symbol)?;
        let points = pairs
            .into_iter()
            .map(|(date, price)| PricePoint { date, price })
            .collect();
        Self::new(symbol, points)
    }

    /// Creates a series from unordered observations, sorting by date.
    ///
    /// Providers hand back rows in whatever order the upstream returned;
    /// this sorts them and rejects duplicates rather than silently picking one.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSeries` on duplicate dates or non-finite prices.
    pub fn from_unsorted(symbol: Symbol, mut points: Vec<PricePoint>) -> CoreResult<Self> {
        points.sort_by_key(|p| p.date);
        Self::new(symbol, points)
    }

    /// The symbol this series belongs to.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// All observations, ascending by date.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Prices only, ascending by date.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Dates only, ascending.
    pub fn dates(&self) -> Vec<Date> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First observation.
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Last observation.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// First observation dated on or after `date`.
    pub fn on_or_after(&self, date: Date) -> Option<&PricePoint> {
        let idx = self.points.partition_point(|p| p.date < date);
        self.points.get(idx)
    }

    /// Price on an exact date.
    pub fn price_on(&self, date: Date) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].price)
    }

    /// Sub-series with dates in `[start, end]`.
    pub fn between(&self, start: Date, end: Date) -> Self {
        Self {
            symbol: self.symbol.clone(),
            points: self
                .points
                .iter()
                .filter(|p| p.date >= start && p.date <= end)
                .copied()
                .collect(),
        }
    }

    /// Sub-series restricted to the given dates (which need not all be present).
    pub fn restricted_to(&self, dates: &[Date]) -> Self {
        Self {
            symbol: self.symbol.clone(),
            points: self
                .points
                .iter()
                .filter(|p| dates.binary_search(&p.date).is_ok())
                .copied()
                .collect(),
        }
    }

    /// Series as a `YYYY-MM-DD -> price` map, the shape the tool layer emits.
    pub fn to_date_map(&self) -> BTreeMap<String, f64> {
        self.points
            .iter()
            .map(|p| (p.date.to_string(), p.price))
            .collect()
    }
}

/// Period-over-period fractional changes derived from a [`PriceSeries`].
///
/// `values[i] = price[i+1] / price[i] - 1` and `dates[i]` is the date of
/// `price[i+1]`, so both vectors have length `len(prices) - 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSeries {
    /// Symbol the returns were derived from.
    pub symbol: Symbol,
    /// End date of each period.
    pub dates: Vec<Date>,
    /// Fractional change of each period.
    pub values: Vec<f64>,
}

impl ReturnSeries {
    /// Number of periods.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no periods.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return values as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}
