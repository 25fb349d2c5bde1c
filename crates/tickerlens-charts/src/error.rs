//! Chart rendering errors.

use thiserror::Error;

use tickerlens_metrics::MetricsError;

/// A specialized Result type for chart rendering.
pub type ChartResult<T> = Result<T, ChartError>;

/// Error type for chart rendering.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// Nothing to draw.
    #[error("no series supplied for {0}")]
    Empty(&'static str),

    /// Too few points for the chart's indicators.
    #[error("{symbol}: chart needs at least {needed} prices, got {got}")]
    InsufficientData {
        /// Symbol of the short series.
        symbol: String,
        /// Minimum length the chart requires.
        needed: usize,
        /// Length supplied.
        got: usize,
    },

    /// An indicator or metric behind the chart failed.
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

impl ChartError {
    /// Stable machine-readable kind, used by the tool layer.
    pub fn kind(&self) -> &'static str {
        match self {
            ChartError::Empty(_) | ChartError::InsufficientData { .. } => "invalid_input",
            ChartError::Metrics(e) => e.kind(),
        }
    }
}
