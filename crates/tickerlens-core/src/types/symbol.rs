//! Ticker symbol type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A ticker symbol in Yahoo Finance format.
///
/// Symbols are trimmed and upper-cased on construction. Yahoo uses `^` for
/// indices (`^GSPC`), `=` for futures and currencies (`EURUSD=X`), `-` for
/// share classes and crypto pairs (`BRK-B`, `BTC-USD`) and `.` for exchange
/// suffixes (`SAP.DE`); those characters are accepted alongside
/// alphanumerics.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Maximum accepted symbol length.
    pub const MAX_LEN: usize = 32;

    /// Parses and normalizes a symbol.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSymbol` for empty, overlong, or
    /// non-ticker text.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(CoreError::InvalidSymbol {
                symbol,
                reason: "symbol must not be empty".to_string(),
            });
        }
        if symbol.len() > Self::MAX_LEN {
            return Err(CoreError::InvalidSymbol {
                symbol,
                reason: format!("symbol longer than {} characters", Self::MAX_LEN),
            });
        }
        if let Some(c) = symbol
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '^' | '=' | '-' | '.')))
        {
            return Err(CoreError::InvalidSymbol {
                reason: format!("illegal character '{c}'"),
                symbol,
            });
        }
        Ok(Self(symbol))
    }

    /// Parses a comma separated list of symbols, skipping empty entries.
    ///
    /// # Errors
    ///
    /// Returns the first symbol error encountered.
    pub fn parse_list(raw: &str) -> CoreResult<Vec<Self>> {
        raw.split(',')
            .filter(|s| !s.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Get the symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
