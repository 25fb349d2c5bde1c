//! Cookie/crumb session for endpoints that demand it.
//!
//! Yahoo's unofficial API wants a session cookie (set by visiting
//! `fc.yahoo.com`) and a crumb fetched with that cookie from
//! `/v1/test/getcrumb`. The cookie lives in the reqwest cookie jar; only
//! the crumb is cached here.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, warn};

use tickerlens_traits::{ProviderError, ProviderResult};

use crate::config::YahooConfig;

const REFERER: &str = "https://finance.yahoo.com/";

#[derive(Debug, Clone)]
struct CachedCrumb {
    value: String,
    fetched_at: Instant,
}

/// Crumb cache with a fixed time-to-live.
///
/// The lock is never held across an await; two concurrent refreshes may
/// both hit Yahoo and the later one wins, which is harmless.
#[derive(Debug)]
pub(crate) struct CrumbCache {
    cached: Mutex<Option<CachedCrumb>>,
    ttl: Duration,
}

impl CrumbCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            cached: Mutex::new(None),
            ttl,
        }
    }

    /// Cached crumb if still fresh.
    pub(crate) fn current(&self) -> Option<String> {
        let guard = self.cached.lock();
        guard
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.ttl)
            .map(|c| c.value.clone())
    }

    pub(crate) fn store(&self, value: String) {
        *self.cached.lock() = Some(CachedCrumb {
            value,
            fetched_at: Instant::now(),
        });
    }

    /// Drops the cached crumb; the next call refreshes.
    pub(crate) fn invalidate(&self) {
        *self.cached.lock() = None;
    }

    /// Fresh crumb, refreshing the session when needed.
    pub(crate) async fn get(&self, client: &reqwest::Client, config: &YahooConfig) -> ProviderResult<String> {
        if let Some(crumb) = self.current() {
            return Ok(crumb);
        }
        let crumb = fetch_crumb(client, config).await?;
        self.store(crumb.clone());
        Ok(crumb)
    }
}

async fn fetch_crumb(client: &reqwest::Client, config: &YahooConfig) -> ProviderResult<String> {
    debug!("refreshing Yahoo session cookie and crumb");

    // The cookie page itself usually answers 404; only the Set-Cookie matters.
    if let Err(e) = client
        .get(&config.cookie_url)
        .header("referer", REFERER)
        .send()
        .await
    {
        warn!(error = %e, "cookie request failed, trying crumb anyway");
    }

    let endpoints = [&config.query1_url, &config.query2_url];
    for base in endpoints {
        let url = format!("{base}/v1/test/getcrumb");
        let response = match client.get(&url).header("referer", REFERER).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(%url, error = %e, "crumb request failed");
                continue;
            }
        };
        if response.status().as_u16() == 429 {
            return Err(ProviderError::RateLimited);
        }
        if !response.status().is_success() {
            debug!(%url, status = %response.status(), "crumb endpoint refused");
            continue;
        }
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        if let Some(crumb) = parse_crumb(&body) {
            return Ok(crumb);
        }
    }

    Err(ProviderError::unavailable(
        "yahoo",
        "crumb token (all crumb endpoints failed)",
    ))
}

/// A crumb is a short token without whitespace; anything else is an error
/// page.
fn parse_crumb(body: &str) -> Option<String> {
    let body = body.trim();
    let looks_valid = !body.is_empty()
        && body.len() < 100
        && !body.contains(char::is_whitespace)
        && !body.contains('<');
    looks_valid.then(|| body.to_string())
}
