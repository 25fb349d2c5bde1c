//! Pairwise correlation matrices.
//!
//! Each pair is correlated over the dates both series share; a date missing
//! from either side is dropped, never filled. With the `parallel` feature the
//! pairs are evaluated on the rayon pool; the result is the same either way.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tickerlens_core::{CorrelationMatrix, PriceSeries, Symbol};

use crate::align::{aligned_prices, common_dates};
use crate::error::{MetricsError, MetricsResult};
use crate::returns::simple_returns;
use crate::stats::pearson;

/// What is correlated once the dates are intersected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationBasis {
    /// Period returns of the intersected prices.
    #[default]
    Returns,
    /// The intersected price levels themselves.
    Prices,
}

/// Correlation matrix of period returns. See [`correlation_matrix_with`].
///
/// # Errors
///
/// As [`correlation_matrix_with`].
pub fn correlation_matrix(
    series_by_symbol: &BTreeMap<Symbol, PriceSeries>,
) -> MetricsResult<CorrelationMatrix> {
    correlation_matrix_with(series_by_symbol, CorrelationBasis::default())
}

/// Pearson correlation matrix over each pair's common dates.
///
/// Rows and columns follow the map's (sorted) symbol order. A single symbol
/// yields `[[1.0]]` once its series is checked for enough data.
///
/// # Errors
///
/// - `InvalidInput` when the map is empty, a pair shares too few dates
///   (2 observations of the chosen basis, so 3 prices for returns), or a
///   price is non-positive under the returns basis.
/// - `NumericDegenerate` when a series is constant over a pair's common dates.
pub fn correlation_matrix_with(
    series_by_symbol: &BTreeMap<Symbol, PriceSeries>,
    basis: CorrelationBasis,
) -> MetricsResult<CorrelationMatrix> {
    if series_by_symbol.is_empty() {
        return Err(MetricsError::invalid("correlation needs at least one symbol"));
    }
    let symbols: Vec<Symbol> = series_by_symbol.keys().cloned().collect();
    let series: Vec<&PriceSeries> = series_by_symbol.values().collect();

    if series.len() == 1 {
        pair_correlation(series[0], series[0], basis)?;
        return Ok(CorrelationMatrix::from_pairs(symbols, |_, _| 1.0));
    }

    let pairs: Vec<(usize, usize)> = (0..series.len())
        .flat_map(|i| ((i + 1)..series.len()).map(move |j| (i, j)))
        .collect();
    let values = evaluate_pairs(&pairs, &series, basis)?;

    let lookup: BTreeMap<(usize, usize), f64> = pairs.into_iter().zip(values).collect();
    Ok(CorrelationMatrix::from_pairs(symbols, |i, j| {
        lookup.get(&(i, j)).copied().unwrap_or(f64::NAN)
    }))
}

#[cfg(feature = "parallel")]
fn evaluate_pairs(
    pairs: &[(usize, usize)],
    series: &[&PriceSeries],
    basis: CorrelationBasis,
) -> MetricsResult<Vec<f64>> {
    use rayon::prelude::*;
    pairs
        .par_iter()
        .map(|&(i, j)| pair_correlation(series[i], series[j], basis))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_pairs(
    pairs: &[(usize, usize)],
    series: &[&PriceSeries],
    basis: CorrelationBasis,
) -> MetricsResult<Vec<f64>> {
    pairs
        .iter()
        .map(|&(i, j)| pair_correlation(series[i], series[j], basis))
        .collect()
}

fn pair_correlation(a: &PriceSeries, b: &PriceSeries, basis: CorrelationBasis) -> MetricsResult<f64> {
    let label = format!("{}/{}", a.symbol(), b.symbol());
    let dates = common_dates(&[a, b]);
    let mut aligned = aligned_prices(&[a, b], &dates).into_iter();
    let (xa, xb) = match (aligned.next(), aligned.next()) {
        (Some(xa), Some(xb)) => (xa, xb),
        _ => return Err(MetricsError::invalid(format!("{label}: alignment failed"))),
    };

    let (xa, xb) = match basis {
        CorrelationBasis::Prices => (xa, xb),
        CorrelationBasis::Returns => {
            if dates.len() < 3 {
                return Err(too_few(&label, dates.len(), 3));
            }
            (
                simple_returns(&xa, a.symbol().as_str())?,
                simple_returns(&xb, b.symbol().as_str())?,
            )
        }
    };
    if xa.len() < 2 {
        return Err(too_few(&label, dates.len(), 2));
    }

    pearson(&xa, &xb).ok_or_else(|| {
        MetricsError::degenerate(format!(
            "{label}: a series is constant over the {} common dates",
            dates.len()
        ))
    })
}

fn too_few(label: &str, have: usize, need: usize) -> MetricsError {
    MetricsError::invalid(format!(
        "{label}: {have} common dates, at least {need} required"
    ))
}
