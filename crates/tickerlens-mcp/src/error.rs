//! Tool-level errors and their MCP wire form.
//!
//! Every failure reaching a client carries a human-readable message and a
//! machine-readable `kind` in the error data: `invalid_input`,
//! `numeric_degenerate`, `not_found` or `upstream`. Caller mistakes become
//! `invalid_params`, everything else `internal_error`.

use rmcp::ErrorData as McpError;
use serde_json::json;
use thiserror::Error;

use tickerlens_charts::ChartError;
use tickerlens_core::CoreError;
use tickerlens_metrics::MetricsError;
use tickerlens_traits::ProviderError;

/// Result type used inside tool bodies.
pub type ToolResult<T> = Result<T, ToolError>;

/// Any failure a tool can report.
#[derive(Debug, Error)]
pub enum ToolError {
    /// An argument that failed validation before any work was done.
    #[error("{0}")]
    InvalidArgument(String),

    /// Value-type construction failed (bad symbol, date, weights).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The market-data provider failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A metric rejected its input.
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// A chart could not be rendered.
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// Output could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// Shorthand for [`ToolError::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::InvalidArgument(_) | ToolError::Core(_) => "invalid_input",
            ToolError::Provider(e) => e.kind(),
            ToolError::Metrics(e) => e.kind(),
            ToolError::Chart(e) => e.kind(),
            ToolError::Serialization(_) => "upstream",
        }
    }

    /// True when the caller can fix the request.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self.kind(), "upstream")
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let data = Some(json!({ "kind": err.kind() }));
        if err.is_caller_error() {
            McpError::invalid_params(err.to_string(), data)
        } else {
            McpError::internal_error(err.to_string(), data)
        }
    }
}
