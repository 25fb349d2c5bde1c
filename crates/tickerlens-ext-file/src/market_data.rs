//! CSV-backed market data provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use tracing::debug;

use tickerlens_core::{
    Date, DividendEvent, EarningsDate, FinancialStatement, Interval, NewsItem, PricePoint,
    PriceSeries, Quote, StatementFrequency, StatementKind, Symbol,
};
use tickerlens_traits::{
    HistoryRange, HistoryRequest, MarketDataProvider, ProviderError, ProviderResult, SourceType,
};

const SOURCE: &str = "csv";

/// One row of `<SYMBOL>.csv`. Other columns (open, high, volume...) are
/// ignored.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Close", default)]
    close: Option<f64>,
}

/// One row of `<SYMBOL>.dividends.csv`.
#[derive(Debug, Deserialize)]
struct DividendRecord {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Amount", alias = "Dividends")]
    amount: f64,
}

/// Accepts `YYYY-MM-DD` optionally followed by a time part, as written by
/// most spreadsheet and pandas exports.
fn parse_row_date(raw: &str) -> ProviderResult<Date> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    Ok(Date::parse(day)?)
}

/// Market data read from a directory of CSV files.
///
/// Files are parsed on first use and cached per symbol; [`reload`]
/// drops the cache so edited files are picked up.
///
/// [`reload`]: CsvMarketData::reload
pub struct CsvMarketData {
    dir: PathBuf,
    prices: DashMap<Symbol, PriceSeries>,
    dividends: DashMap<Symbol, Vec<DividendEvent>>,
}

impl std::fmt::Debug for CsvMarketData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvMarketData")
            .field("dir", &self.dir)
            .field("cached_symbols", &self.prices.len())
            .finish()
    }
}

impl CsvMarketData {
    /// Creates a provider over `dir`.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` when `dir` is not an existing directory.
    pub fn new(dir: impl AsRef<Path>) -> ProviderResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(ProviderError::InvalidRequest(format!(
                "CSV data directory {} does not exist",
                dir.display()
            )));
        }
        Ok(Self {
            dir,
            prices: DashMap::new(),
            dividends: DashMap::new(),
        })
    }

    /// Directory the files are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Drops every cached file.
    pub fn reload(&self) {
        self.prices.clear();
        self.dividends.clear();
    }

    fn price_path(&self, symbol: &Symbol) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    fn dividend_path(&self, symbol: &Symbol) -> PathBuf {
        self.dir.join(format!("{symbol}.dividends.csv"))
    }

    /// Full cached series for `symbol`, loading it on first use.
    async fn series(&self, symbol: &Symbol) -> ProviderResult<PriceSeries> {
        if let Some(cached) = self.prices.get(symbol) {
            return Ok(cached.clone());
        }
        let path = self.price_path(symbol);
        if !path.is_file() {
            return Err(ProviderError::NotFound(symbol.to_string()));
        }
        let owned = symbol.clone();
        let series = tokio::task::spawn_blocking(move || load_prices(&path, owned))
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))??;
        debug!(%symbol, points = series.len(), "loaded CSV prices");
        self.prices.insert(symbol.clone(), series.clone());
        Ok(series)
    }
}

fn load_prices(path: &Path, symbol: Symbol) -> ProviderResult<PriceSeries> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| ProviderError::Transport(e.to_string()))?;
    let mut points = Vec::new();
    for (line, result) in reader.deserialize::<PriceRecord>().enumerate() {
        let record =
            result.map_err(|e| ProviderError::Parse(format!("{}: row {}: {e}", path.display(), line + 1)))?;
        // Blank closes mark holidays in some exports.
        let Some(price) = record.close else {
            continue;
        };
        points.push(PricePoint {
            date: parse_row_date(&record.date)?,
            price,
        });
    }
    if points.is_empty() {
        return Err(ProviderError::NoData(format!("{symbol}: {} has no prices", path.display())));
    }
    Ok(PriceSeries::from_unsorted(symbol, points)?)
}

fn load_dividends(path: &Path) -> ProviderResult<Vec<DividendEvent>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| ProviderError::Transport(e.to_string()))?;
    let mut events = Vec::new();
    for result in reader.deserialize::<DividendRecord>() {
        let record = result.map_err(|e| ProviderError::Parse(format!("{}: {e}", path.display())))?;
        events.push(DividendEvent {
            date: parse_row_date(&record.date)?,
            amount: record.amount,
        });
    }
    events.sort_by_key(|e| e.date);
    Ok(events)
}

/// Applies a history range. Look-back periods end at the last row in the
/// file, not at today, so stale exports still answer.
fn select_range(series: &PriceSeries, range: &HistoryRange) -> PriceSeries {
    match range {
        HistoryRange::Between { start, end } => series.between(*start, *end),
        HistoryRange::Period(period) => {
            let Some(last) = series.last() else {
                return series.clone();
            };
            match period.start_from(last.date) {
                Some(start) => series.between(start, last.date),
                None => series.clone(),
            }
        }
    }
}

#[async_trait]
impl MarketDataProvider for CsvMarketData {
    fn name(&self) -> &str {
        SOURCE
    }

    fn source_type(&self) -> SourceType {
        SourceType::File
    }

    async fn current_price(&self, symbol: &Symbol) -> ProviderResult<Quote> {
        let series = self.series(symbol).await?;
        let points = series.points();
        let last = points
            .last()
            .ok_or_else(|| ProviderError::NoData(symbol.to_string()))?;
        Ok(Quote {
            symbol: symbol.clone(),
            price: last.price,
            currency: None,
            previous_close: points.len().checked_sub(2).map(|i| points[i].price),
            timestamp: Some(last.date.unix_timestamp()),
        })
    }

    async fn price_history(&self, request: &HistoryRequest) -> ProviderResult<PriceSeries> {
        if request.interval != Interval::OneDay {
            return Err(ProviderError::InvalidRequest(format!(
                "CSV files hold daily closes; interval {} is not supported",
                request.interval.as_str()
            )));
        }
        let series = self.series(&request.symbol).await?;
        let selected = select_range(&series, &request.range);
        if selected.is_empty() {
            return Err(ProviderError::NoData(format!(
                "{}: no prices in the requested range",
                request.symbol
            )));
        }
        Ok(selected)
    }

    async fn dividends(&self, symbol: &Symbol) -> ProviderResult<Vec<DividendEvent>> {
        if let Some(cached) = self.dividends.get(symbol) {
            return Ok(cached.clone());
        }
        let path = self.dividend_path(symbol);
        let events = if path.is_file() {
            tokio::task::spawn_blocking(move || load_dividends(&path))
                .await
                .map_err(|e| ProviderError::Transport(e.to_string()))??
        } else if self.price_path(symbol).is_file() {
            // Known symbol without a dividend file pays nothing.
            Vec::new()
        } else {
            return Err(ProviderError::NotFound(symbol.to_string()));
        };
        self.dividends.insert(symbol.clone(), events.clone());
        Ok(events)
    }

    async fn financial_statement(
        &self,
        _symbol: &Symbol,
        kind: StatementKind,
        _frequency: StatementFrequency,
    ) -> ProviderResult<FinancialStatement> {
        Err(ProviderError::unavailable(SOURCE, format!("{kind} statements")))
    }

    async fn earnings_dates(&self, _symbol: &Symbol, _limit: usize) -> ProviderResult<Vec<EarningsDate>> {
        Err(ProviderError::unavailable(SOURCE, "earnings dates"))
    }

    async fn news(&self, _symbol: &Symbol) -> ProviderResult<Vec<NewsItem>> {
        Err(ProviderError::unavailable(SOURCE, "news"))
    }
}
