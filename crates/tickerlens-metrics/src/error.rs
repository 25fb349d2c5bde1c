//! Error types for the metrics engine.
//!
//! The engine reports exactly two kinds of failure: the caller supplied
//! something out of domain, or the computation is mathematically undefined
//! for otherwise valid input. Neither is transient, so nothing retries.

use thiserror::Error;

use tickerlens_core::CoreError;

/// Error type for all metric computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// Malformed, empty, or out-of-domain arguments.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Well-formed input for which the statistic is undefined
    /// (for example a constant series in a correlation).
    #[error("numerically degenerate: {0}")]
    NumericDegenerate(String),
}

impl MetricsError {
    /// Shorthand for [`MetricsError::InvalidInput`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// Shorthand for [`MetricsError::NumericDegenerate`].
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::NumericDegenerate(reason.into())
    }

    /// Stable machine-readable kind, used by the tool layer.
    pub fn kind(&self) -> &'static str {
        match self {
            MetricsError::InvalidInput(_) => "invalid_input",
            MetricsError::NumericDegenerate(_) => "numeric_degenerate",
        }
    }
}

/// Result type alias for metric computations.
pub type MetricsResult<T> = Result<T, MetricsError>;

impl From<CoreError> for MetricsError {
    fn from(err: CoreError) -> Self {
        MetricsError::InvalidInput(err.to_string())
    }
}
