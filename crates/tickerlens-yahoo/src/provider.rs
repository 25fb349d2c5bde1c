//! HTTP client side of the Yahoo provider.

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use tickerlens_core::{
    Date, DividendEvent, EarningsDate, FinancialStatement, Interval, NewsItem, PriceSeries, Quote,
    StatementFrequency, StatementKind, Symbol,
};
use tickerlens_traits::{
    HistoryRange, HistoryRequest, MarketDataProvider, ProviderError, ProviderResult, SourceType,
};

use crate::auth::CrumbCache;
use crate::config::YahooConfig;
use crate::wire;

/// Earliest date asked of the fundamentals endpoint (2016-01-01).
const FUNDAMENTALS_EPOCH: i64 = 1_451_606_400;

/// Yahoo Finance market-data provider.
#[derive(Debug)]
pub struct YahooProvider {
    client: reqwest::Client,
    config: YahooConfig,
    crumb: CrumbCache,
}

impl YahooProvider {
    /// Creates a provider with its own cookie-enabled HTTP client.
    ///
    /// # Errors
    ///
    /// `Transport` when the HTTP client cannot be built (TLS backend
    /// initialization).
    pub fn new(config: YahooConfig) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| ProviderError::Transport(format!("building HTTP client: {e}")))?;
        let crumb = CrumbCache::new(config.crumb_ttl());
        Ok(Self {
            client,
            config,
            crumb,
        })
    }

    /// Provider settings.
    pub fn config(&self) -> &YahooConfig {
        &self.config
    }

    fn chart_url(&self, symbol: &Symbol, query: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?{query}",
            self.config.query1_url,
            urlencoding::encode(symbol.as_str())
        )
    }

    async fn fetch_chart(&self, symbol: &Symbol, query: &str) -> ProviderResult<wire::ChartResult> {
        let body = self.get_text(&self.chart_url(symbol, query), symbol).await?;
        wire::parse_chart(&body, symbol)
    }

    /// GET returning the body, with HTTP status mapped to provider errors.
    ///
    /// Chart and quoteSummary answer 404 with a JSON error object naming
    /// the problem; that body is passed through so the parser can report it.
    async fn get_text(&self, url: &str, symbol: &Symbol) -> ProviderResult<String> {
        debug!(%url, "yahoo request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        match status.as_u16() {
            200..=299 => Ok(body),
            404 if body.trim_start().starts_with('{') => Ok(body),
            404 => Err(ProviderError::NotFound(symbol.to_string())),
            429 => Err(ProviderError::RateLimited),
            code => Err(ProviderError::Transport(format!("yahoo returned HTTP {code}"))),
        }
    }

    /// GET with the crumb appended, refreshing the session once on 401/429.
    async fn get_with_crumb(&self, base_url: &str, symbol: &Symbol) -> ProviderResult<String> {
        let mut refreshed = false;
        loop {
            let crumb = self.crumb.get(&self.client, &self.config).await?;
            let url = format!("{base_url}&crumb={}", urlencoding::encode(&crumb));
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| ProviderError::Transport(e.to_string()))?;
            let status = response.status().as_u16();

            if matches!(status, 401 | 429) {
                self.crumb.invalidate();
                if refreshed {
                    return Err(if status == 429 {
                        ProviderError::RateLimited
                    } else {
                        ProviderError::unavailable("yahoo", "authenticated endpoint (crumb rejected)")
                    });
                }
                warn!(status, "yahoo rejected crumb, refreshing session");
                refreshed = true;
                continue;
            }

            let body = response
                .text()
                .await
                .map_err(|e| ProviderError::Transport(e.to_string()))?;
            return match status {
                200..=299 => Ok(body),
                404 if body.trim_start().starts_with('{') => Ok(body),
                404 => Err(ProviderError::NotFound(symbol.to_string())),
                code => Err(ProviderError::Transport(format!("yahoo returned HTTP {code}"))),
            };
        }
    }
}

/// Query string selecting a chart window.
///
/// Explicit ranges become `period1`/`period2` (end exclusive, so one day is
/// added); look-back periods use Yahoo's own `range` codes.
pub(crate) fn chart_query(range: &HistoryRange, interval: Interval) -> String {
    match range {
        HistoryRange::Between { start, end } => format!(
            "period1={}&period2={}&interval={}&includeAdjustedClose=true",
            start.unix_timestamp(),
            end.add_days(1).unix_timestamp(),
            interval.as_str()
        ),
        HistoryRange::Period(period) => format!(
            "range={}&interval={}&includeAdjustedClose=true",
            period.as_str(),
            interval.as_str()
        ),
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn source_type(&self) -> SourceType {
        SourceType::Http
    }

    #[instrument(skip_all, fields(symbol = %symbol))]
    async fn current_price(&self, symbol: &Symbol) -> ProviderResult<Quote> {
        let chart = self.fetch_chart(symbol, "range=1d&interval=1d").await?;
        wire::chart_quote(symbol, &chart)
    }

    #[instrument(skip_all, fields(symbol = %request.symbol))]
    async fn price_history(&self, request: &HistoryRequest) -> ProviderResult<PriceSeries> {
        let query = chart_query(&request.range, request.interval);
        let chart = self.fetch_chart(&request.symbol, &query).await?;
        let series = wire::chart_series(&request.symbol, &chart)?;

        // Bars stamped in exchange time can spill one day past a UTC window.
        match request.range {
            HistoryRange::Between { start, end } => {
                let trimmed = series.between(start, end);
                if trimmed.is_empty() {
                    return Err(ProviderError::NoData(format!(
                        "{}: no prices between {start} and {end}",
                        request.symbol
                    )));
                }
                Ok(trimmed)
            }
            HistoryRange::Period(_) => Ok(series),
        }
    }

    #[instrument(skip_all, fields(symbol = %symbol))]
    async fn dividends(&self, symbol: &Symbol) -> ProviderResult<Vec<DividendEvent>> {
        let chart = self
            .fetch_chart(symbol, "range=max&interval=1mo&events=div")
            .await?;
        wire::chart_dividends(&chart)
    }

    #[instrument(skip_all, fields(symbol = %symbol))]
    async fn financial_statement(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
        frequency: StatementFrequency,
    ) -> ProviderResult<FinancialStatement> {
        let encoded = urlencoding::encode(symbol.as_str());
        let url = format!(
            "{}/ws/fundamentals-timeseries/v1/finance/timeseries/{encoded}?symbol={encoded}&type={}&period1={FUNDAMENTALS_EPOCH}&period2={}",
            self.config.query2_url,
            wire::statement_types(kind, frequency),
            Date::today().add_days(1).unix_timestamp(),
        );
        let body = self.get_text(&url, symbol).await?;
        wire::parse_statement(&body, symbol, kind, frequency)
    }

    #[instrument(skip_all, fields(symbol = %symbol))]
    async fn earnings_dates(&self, symbol: &Symbol, limit: usize) -> ProviderResult<Vec<EarningsDate>> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=earningsHistory,calendarEvents",
            self.config.query2_url,
            urlencoding::encode(symbol.as_str())
        );
        let body = self.get_with_crumb(&url, symbol).await?;
        wire::parse_earnings(&body, symbol, limit)
    }

    #[instrument(skip_all, fields(symbol = %symbol))]
    async fn news(&self, symbol: &Symbol) -> ProviderResult<Vec<NewsItem>> {
        let url = format!(
            "{}/v1/finance/search?q={}&quotesCount=0&newsCount={}",
            self.config.query2_url,
            urlencoding::encode(symbol.as_str()),
            self.config.news_count
        );
        let body = self.get_text(&url, symbol).await?;
        wire::parse_news(&body)
    }
}
