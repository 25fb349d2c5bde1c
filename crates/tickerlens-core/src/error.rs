//! Error types for the core value types.
//!
//! Construction of a value type fails with [`CoreError`] when the input
//! violates one of the type's invariants.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The error type for value-type construction and parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date parsing or an out-of-range date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A ticker symbol that is empty or contains illegal characters.
    #[error("Invalid symbol '{symbol}': {reason}")]
    InvalidSymbol {
        /// The rejected symbol text.
        symbol: String,
        /// Reason for rejection.
        reason: String,
    },

    /// A price series that violates ordering or finiteness.
    #[error("Invalid series for {symbol}: {reason}")]
    InvalidSeries {
        /// Symbol of the offending series.
        symbol: String,
        /// Description of the violation.
        reason: String,
    },

    /// Portfolio weights that cannot be used.
    #[error("Invalid weights: {reason}")]
    InvalidWeights {
        /// Description of the violation.
        reason: String,
    },

    /// A value outside a closed vocabulary (period, interval, frequency).
    #[error("Unknown {kind} '{value}', expected one of: {expected}")]
    UnknownVariant {
        /// The vocabulary being parsed.
        kind: &'static str,
        /// The rejected text.
        value: String,
        /// Comma separated list of accepted values.
        expected: &'static str,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid series error.
    #[must_use]
    pub fn invalid_series(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSeries {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid weights error.
    #[must_use]
    pub fn invalid_weights(reason: impl Into<String>) -> Self {
        Self::InvalidWeights {
            reason: reason.into(),
        }
    }
}
