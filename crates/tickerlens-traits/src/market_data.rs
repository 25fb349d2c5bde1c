//! Market-data provider trait and request types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tickerlens_core::{
    Date, DividendEvent, EarningsDate, FinancialStatement, Interval, NewsItem, Period, PricePoint,
    PriceSeries, Quote, StatementFrequency, StatementKind, Symbol,
};

use crate::error::{ProviderError, ProviderResult};

/// Where a provider's data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Remote HTTP API.
    Http,
    /// Files on local disk.
    File,
    /// Generated in process (demo mode, tests).
    Synthetic,
}

/// Date window of a history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryRange {
    /// Explicit inclusive dates.
    Between {
        /// First date.
        start: Date,
        /// Last date.
        end: Date,
    },
    /// Look-back period ending at the latest available data.
    Period(Period),
}

/// A price history request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// Symbol to fetch.
    pub symbol: Symbol,
    /// Date window.
    pub range: HistoryRange,
    /// Bar size.
    pub interval: Interval,
}

impl HistoryRequest {
    /// History between two inclusive dates.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` when `start` is after `end`.
    pub fn between(symbol: Symbol, start: Date, end: Date, interval: Interval) -> ProviderResult<Self> {
        if start > end {
            return Err(ProviderError::InvalidRequest(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self {
            symbol,
            range: HistoryRange::Between { start, end },
            interval,
        })
    }

    /// History over a look-back period.
    pub fn period(symbol: Symbol, period: Period, interval: Interval) -> Self {
        Self {
            symbol,
            range: HistoryRange::Period(period),
            interval,
        }
    }
}

/// Trait for market-data providers.
///
/// Implementations must be cheap to share (`Send + Sync`) and internally
/// synchronized; the server calls them concurrently from many tool
/// invocations. Series handed back are already validated [`PriceSeries`]
/// values (ascending, unique, finite).
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Provider name for logs and error messages.
    fn name(&self) -> &str;

    /// Source type.
    fn source_type(&self) -> SourceType;

    /// Latest price.
    async fn current_price(&self, symbol: &Symbol) -> ProviderResult<Quote>;

    /// Closing prices for a request. An empty window is `NoData`, never an
    /// empty series.
    async fn price_history(&self, request: &HistoryRequest) -> ProviderResult<PriceSeries>;

    /// Full dividend history, ascending.
    async fn dividends(&self, symbol: &Symbol) -> ProviderResult<Vec<DividendEvent>>;

    /// Income statement or cash-flow statement.
    async fn financial_statement(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
        frequency: StatementFrequency,
    ) -> ProviderResult<FinancialStatement>;

    /// Most recent earnings dates (past and scheduled), newest first.
    async fn earnings_dates(&self, symbol: &Symbol, limit: usize) -> ProviderResult<Vec<EarningsDate>>;

    /// Recent news headlines.
    async fn news(&self, symbol: &Symbol) -> ProviderResult<Vec<NewsItem>>;

    /// First close on or after `date`, looking at most a week ahead so
    /// weekends and holidays resolve to the next session.
    async fn price_on_or_after(&self, symbol: &Symbol, date: Date) -> ProviderResult<PricePoint> {
        let request = HistoryRequest::between(symbol.clone(), date, date.add_days(7), Interval::OneDay)?;
        let series = self.price_history(&request).await?;
        series
            .on_or_after(date)
            .copied()
            .ok_or_else(|| ProviderError::NoData(format!("{symbol}: no price on or after {date}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    #[async_trait]
    impl MarketDataProvider for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn source_type(&self) -> SourceType {
            SourceType::Synthetic
        }

        async fn current_price(&self, symbol: &Symbol) -> ProviderResult<Quote> {
            Ok(Quote {
                symbol: symbol.clone(),
                price: 1.0,
                currency: None,
                previous_close: None,
                timestamp: None,
            })
        }

        async fn price_history(&self, request: &HistoryRequest) -> ProviderResult<PriceSeries> {
            let d = |day| Date::from_ymd(2025, 1, day).unwrap();
            let full = PriceSeries::from_pairs(
                request.symbol.as_str(),
                vec![(d(3), 10.0), (d(6), 11.0), (d(7), 12.0)],
            )?;
            match request.range {
                HistoryRange::Between { start, end } => Ok(full.between(start, end)),
                HistoryRange::Period(_) => Ok(full),
            }
        }

        async fn dividends(&self, _: &Symbol) -> ProviderResult<Vec<DividendEvent>> {
            Ok(Vec::new())
        }

        async fn financial_statement(
            &self,
            _: &Symbol,
            _: StatementKind,
            _: StatementFrequency,
        ) -> ProviderResult<FinancialStatement> {
            Err(ProviderError::unavailable("fixed", "statements"))
        }

        async fn earnings_dates(&self, _: &Symbol, _: usize) -> ProviderResult<Vec<EarningsDate>> {
            Ok(Vec::new())
        }

        async fn news(&self, _: &Symbol) -> ProviderResult<Vec<NewsItem>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_price_on_or_after_skips_weekend() {
        let sym = Symbol::parse("X").unwrap();
        let saturday = Date::from_ymd(2025, 1, 4).unwrap();
        let point = Fixed.price_on_or_after(&sym, saturday).await.unwrap();
        assert_eq!(point.date, Date::from_ymd(2025, 1, 6).unwrap());
        assert_eq!(point.price, 11.0);

        let late = Date::from_ymd(2025, 2, 1).unwrap();
        assert!(matches!(
            Fixed.price_on_or_after(&sym, late).await,
            Err(ProviderError::NoData(_))
        ));
    }

    #[test]
    fn test_between_rejects_inverted_range() {
        let sym = Symbol::parse("X").unwrap();
        let a = Date::from_ymd(2025, 1, 4).unwrap();
        assert!(HistoryRequest::between(sym, a, a.add_days(-1), Interval::OneDay).is_err());
    }
}
