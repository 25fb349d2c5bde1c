//! Yahoo provider settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Browser-like user agent; Yahoo rejects obvious bots on the crumb endpoint.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Settings for [`crate::YahooProvider`].
///
/// Every field has a default, so a config file only lists what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    /// Host serving chart and crumb requests.
    pub query1_url: String,
    /// Host serving quoteSummary, fundamentals and search.
    pub query2_url: String,
    /// Page visited to obtain the session cookie.
    pub cookie_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// User-Agent header.
    pub user_agent: String,
    /// Lifetime of a cached crumb in seconds.
    pub crumb_ttl_secs: u64,
    /// Number of headlines requested from search.
    pub news_count: usize,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            query1_url: "https://query1.finance.yahoo.com".to_string(),
            query2_url: "https://query2.finance.yahoo.com".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            crumb_ttl_secs: 3600,
            news_count: 10,
        }
    }
}

impl YahooConfig {
    /// Config pointing every endpoint at one base URL (tests, proxies).
    pub fn with_base_url(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            query1_url: base.clone(),
            query2_url: base.clone(),
            cookie_url: base,
            ..Self::default()
        }
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Crumb lifetime.
    pub fn crumb_ttl(&self) -> Duration {
        Duration::from_secs(self.crumb_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let cfg: YahooConfig = serde_json::from_str(r#"{"timeout_secs": 3}"#).unwrap();
        assert_eq!(cfg.timeout(), Duration::from_secs(3));
        assert_eq!(cfg.crumb_ttl_secs, 3600);
        assert!(cfg.query2_url.starts_with("https://query2"));
    }
}
