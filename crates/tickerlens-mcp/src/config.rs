//! Server configuration.
//!
//! Loaded from an optional TOML file; every field has a default, so a file
//! only lists what it overrides. Command-line flags are applied on top by
//! the binary.
//!
//! ```toml
//! [transport]
//! host = "0.0.0.0"
//! port = 9000
//!
//! [provider]
//! kind = "csv"
//! data_dir = "./data"
//!
//! [provider.yahoo]
//! timeout_secs = 20
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tickerlens_ext_file::CsvMarketData;
use tickerlens_traits::{MarketDataProvider, ProviderError};
use tickerlens_yahoo::{YahooConfig, YahooProvider};

/// Configuration result type.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`ServerConfig`].
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },

    /// Values that parse but cannot be used together.
    #[error("Validation error: {field}: {message}")]
    Validation {
        /// Offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// The configured provider failed to start.
    #[error("provider setup failed: {0}")]
    Provider(#[from] ProviderError),
}

impl ConfigError {
    fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Which market-data source backs the tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Yahoo Finance over HTTP.
    #[default]
    Yahoo,
    /// A directory of CSV files.
    Csv,
}

/// HTTP transport settings (used with `--http`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Market-data provider settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Source selection.
    pub kind: ProviderKind,
    /// Directory of `<SYMBOL>.csv` files, required for `csv`.
    pub data_dir: Option<PathBuf>,
    /// Yahoo endpoints, timeout and user agent.
    pub yahoo: YahooConfig,
}

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP transport.
    pub transport: TransportConfig,
    /// Market data.
    pub provider: ProviderConfig,
}

impl ServerConfig {
    /// Reads a TOML file.
    ///
    /// # Errors
    ///
    /// `Io` when unreadable, `Parse` on malformed TOML or unknown values.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// `Validation` when the CSV provider has no data directory or the
    /// Yahoo timeout is zero.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.provider.kind == ProviderKind::Csv && self.provider.data_dir.is_none() {
            return Err(ConfigError::validation(
                "provider.data_dir",
                "required when provider.kind = \"csv\"",
            ));
        }
        if self.provider.yahoo.timeout_secs == 0 {
            return Err(ConfigError::validation(
                "provider.yahoo.timeout_secs",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Builds the configured provider.
    ///
    /// # Errors
    ///
    /// Validation failures, or the provider's own setup error (missing CSV
    /// directory, HTTP client construction).
    pub fn build_provider(&self) -> ConfigResult<Arc<dyn MarketDataProvider>> {
        self.validate()?;
        match self.provider.kind {
            ProviderKind::Yahoo => Ok(Arc::new(YahooProvider::new(self.provider.yahoo.clone())?)),
            ProviderKind::Csv => {
                let dir = self
                    .provider
                    .data_dir
                    .as_ref()
                    .ok_or_else(|| ConfigError::validation("provider.data_dir", "missing"))?;
                Ok(Arc::new(CsvMarketData::new(dir)?))
            }
        }
    }
}
