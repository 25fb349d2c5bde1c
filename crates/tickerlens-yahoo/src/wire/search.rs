//! `v1/finance/search` news payloads.

use serde::Deserialize;

use tickerlens_core::NewsItem;
use tickerlens_traits::ProviderResult;

use super::parse_json;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<NewsRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsRow {
    title: String,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    provider_publish_time: Option<i64>,
    #[serde(default)]
    related_tickers: Vec<String>,
}

/// Headlines from a search response, in Yahoo's order.
///
/// # Errors
///
/// `Parse` for malformed bodies. No news is an empty list, not an error.
pub fn parse_news(body: &str) -> ProviderResult<Vec<NewsItem>> {
    let response: SearchResponse = parse_json(body, "search")?;
    Ok(response
        .news
        .into_iter()
        .map(|row| NewsItem {
            title: row.title,
            publisher: row.publisher,
            link: row.link,
            published_at: row.provider_publish_time,
            related_tickers: row.related_tickers,
        })
        .collect())
}
