//! Portfolio weight specification.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Symbol;
use crate::error::{CoreError, CoreResult};

/// Tolerance under which a weight sum counts as zero.
const WEIGHT_SUM_EPSILON: f64 = 1e-12;

/// Mapping from symbol to portfolio weight.
///
/// Weight policy: weights must be finite and non-negative with a positive
/// sum. Weights that do not sum to 1 are **normalized** (each weight divided
/// by the total) by [`PortfolioSpec::normalized`]; nothing downstream sees
/// raw weights.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortfolioSpec {
    weights: BTreeMap<Symbol, f64>,
}

impl PortfolioSpec {
    /// Creates a spec, validating each weight.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidWeights` for non-finite or negative weights.
    pub fn new(weights: BTreeMap<Symbol, f64>) -> CoreResult<Self> {
        for (symbol, weight) in &weights {
            if !weight.is_finite() {
                return Err(CoreError::invalid_weights(format!(
                    "weight for {symbol} is not finite"
                )));
            }
            if *weight < 0.0 {
                return Err(CoreError::invalid_weights(format!(
                    "weight for {symbol} is negative ({weight}); short positions are not supported"
                )));
            }
        }
        Ok(Self { weights })
    }

    /// Creates a spec from `(symbol, weight)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid symbol, a repeated symbol or an invalid weight.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> CoreResult<Self> {
        let mut weights = BTreeMap::new();
        for (raw, weight) in pairs {
            let symbol = Symbol::parse(raw)?;
            if weights.insert(symbol.clone(), weight).is_some() {
                return Err(CoreError::invalid_weights(format!(
                    "symbol {symbol} listed more than once"
                )));
            }
        }
        Self::new(weights)
    }

    /// Equal weights across the given symbols.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidWeights` when `symbols` is empty.
    pub fn equal_weight(symbols: &[Symbol]) -> CoreResult<Self> {
        if symbols.is_empty() {
            return Err(CoreError::invalid_weights("no symbols supplied"));
        }
        let w = 1.0 / symbols.len() as f64;
        Self::new(symbols.iter().map(|s| (s.clone(), w)).collect())
    }

    /// Weights exactly as supplied.
    pub fn weights(&self) -> &BTreeMap<Symbol, f64> {
        &self.weights
    }

    /// Symbols in the portfolio, sorted.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.weights.keys()
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True for an empty portfolio.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of the raw weights.
    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Weights rescaled to sum to 1.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidWeights` when the portfolio is empty or the
    /// weights sum to zero or overflow.
    pub fn normalized(&self) -> CoreResult<BTreeMap<Symbol, f64>> {
        if self.weights.is_empty() {
            return Err(CoreError::invalid_weights("portfolio has no positions"));
        }
        let total = self.total_weight();
        if !total.is_finite() {
            return Err(CoreError::invalid_weights(format!("weights sum to {total}")));
        }
        if total.abs() < WEIGHT_SUM_EPSILON {
            return Err(CoreError::invalid_weights("weights sum to zero"));
        }
        Ok(self
            .weights
            .iter()
            .map(|(s, w)| (s.clone(), w / total))
            .collect())
    }
}
