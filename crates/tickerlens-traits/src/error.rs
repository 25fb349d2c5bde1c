//! Error types for market-data providers.

use thiserror::Error;

/// Error type for provider operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The symbol is unknown to the source.
    #[error("symbol not found: {0}")]
    NotFound(String),

    /// The symbol exists but the source has nothing for the request.
    #[error("no data: {0}")]
    NoData(String),

    /// The request cannot be served as asked (bad range, unsupported interval).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The source does not offer this capability.
    #[error("not available from {source_name}: {what}")]
    Unavailable {
        /// Provider name.
        source_name: String,
        /// Capability that was asked for.
        what: String,
    },

    /// Upstream throttled the request.
    #[error("rate limited by upstream")]
    RateLimited,

    /// Upstream answered with something that could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Network or I/O failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ProviderError {
    /// Shorthand for [`ProviderError::Unavailable`].
    pub fn unavailable(source_name: impl Into<String>, what: impl Into<String>) -> Self {
        Self::Unavailable {
            source_name: source_name.into(),
            what: what.into(),
        }
    }

    /// Stable machine-readable kind, used by the tool layer.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotFound(_) | ProviderError::NoData(_) => "not_found",
            ProviderError::InvalidRequest(_) => "invalid_input",
            ProviderError::Unavailable { .. }
            | ProviderError::RateLimited
            | ProviderError::Parse(_)
            | ProviderError::Transport(_) => "upstream",
        }
    }

    /// True when the caller, not the source, is at fault.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ProviderError::NotFound(_) | ProviderError::NoData(_) | ProviderError::InvalidRequest(_)
        )
    }
}

impl From<std::io::Error> for ProviderError {
    fn from(e: std::io::Error) -> Self {
        ProviderError::Transport(e.to_string())
    }
}

impl From<tickerlens_core::CoreError> for ProviderError {
    fn from(e: tickerlens_core::CoreError) -> Self {
        ProviderError::Parse(e.to_string())
    }
}

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(ProviderError::NotFound("ZZZZ".into()).kind(), "not_found");
        assert_eq!(ProviderError::RateLimited.kind(), "upstream");
        assert_eq!(ProviderError::InvalidRequest("x".into()).kind(), "invalid_input");
        assert!(!ProviderError::unavailable("csv", "news").is_caller_error());
    }

    #[test]
    fn test_display() {
        let err = ProviderError::unavailable("csv", "news");
        assert_eq!(err.to_string(), "not available from csv: news");
    }
}
