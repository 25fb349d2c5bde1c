//! Metric result shapes.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use super::{Date, Symbol};

/// A single named metric: a number or an ordered sequence of numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// A single statistic (Sharpe ratio, drawdown, ...).
    Scalar(f64),
    /// An ordered sequence (moving average, value curve, ...).
    Series(Vec<f64>),
}

impl MetricValue {
    /// The scalar value, if this is a scalar.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            MetricValue::Scalar(v) => Some(*v),
            MetricValue::Series(_) => None,
        }
    }

    /// The sequence, if this is a series.
    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            MetricValue::Scalar(_) => None,
            MetricValue::Series(v) => Some(v),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Scalar(v)
    }
}

impl From<Vec<f64>> for MetricValue {
    fn from(v: Vec<f64>) -> Self {
        MetricValue::Series(v)
    }
}

/// Named metrics plus the symbols and date range they were computed over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricResult {
    /// Symbols the metrics describe.
    pub symbols: Vec<Symbol>,
    /// First date of the input data.
    pub start: Option<Date>,
    /// Last date of the input data.
    pub end: Option<Date>,
    /// Metric name to value.
    pub metrics: BTreeMap<String, MetricValue>,
}

impl MetricResult {
    /// Creates an empty result for the given symbols and range.
    pub fn new(symbols: Vec<Symbol>, start: Option<Date>, end: Option<Date>) -> Self {
        Self {
            symbols,
            start,
            end,
            metrics: BTreeMap::new(),
        }
    }

    /// Adds a metric, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        self.metrics.insert(name.into(), value.into());
        self
    }

    /// Adds a metric in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<MetricValue>) {
        self.metrics.insert(name.into(), value.into());
    }

    /// Looks up a metric.
    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.metrics.get(name)
    }

    /// Looks up a scalar metric.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(MetricValue::as_scalar)
    }

    /// Looks up a series metric.
    pub fn series(&self, name: &str) -> Option<&[f64]> {
        self.get(name).and_then(MetricValue::as_series)
    }
}

/// Square, symmetric matrix of pairwise correlations keyed by symbol.
///
/// Diagonal entries are exactly 1.0 and `get(a, b) == get(b, a)` bit for
/// bit; constructors outside this crate go through [`CorrelationMatrix::from_pairs`]
/// which enforces both.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    symbols: Vec<Symbol>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Builds a matrix from the upper-triangle pair values.
    ///
    /// `pair_value(i, j)` is called once for every `i < j`; the result is
    /// mirrored into `(j, i)` and the diagonal is set to 1.0.
    pub fn from_pairs<F>(symbols: Vec<Symbol>, mut pair_value: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let n = symbols.len();
        let mut values = vec![vec![0.0; n]; n];
        for i in 0..n {
            values[i][i] = 1.0;
            for j in (i + 1)..n {
                let v = pair_value(i, j);
                values[i][j] = v;
                values[j][i] = v;
            }
        }
        Self { symbols, values }
    }

    /// Symbols in row/column order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Matrix rows in symbol order.
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Dimension of the matrix.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True for a matrix with no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Correlation between two symbols.
    pub fn get(&self, a: &Symbol, b: &Symbol) -> Option<f64> {
        let i = self.symbols.iter().position(|s| s == a)?;
        let j = self.symbols.iter().position(|s| s == b)?;
        Some(self.values[i][j])
    }
}

impl Serialize for CorrelationMatrix {
    /// Serializes as a nested `{ "A": { "A": 1.0, "B": 0.42 }, ... }` object.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut outer = serializer.serialize_map(Some(self.symbols.len()))?;
        for (i, row_symbol) in self.symbols.iter().enumerate() {
            let row: BTreeMap<&str, f64> = self
                .symbols
                .iter()
                .enumerate()
                .map(|(j, s)| (s.as_str(), self.values[i][j]))
                .collect();
            outer.serialize_entry(row_symbol.as_str(), &row)?;
        }
        outer.end()
    }
}
