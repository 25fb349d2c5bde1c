//! Demo mode with a deterministic synthetic market.
//!
//! Five years of business-day closes ending 2025-12-31 for a small universe
//! of indices and large caps. Every series is driven by one shared market
//! factor plus a per-symbol idiosyncratic term, so betas and correlations
//! come out plausible. The same build always produces bit-identical data.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use tickerlens_core::{
    CoreError, Date, DividendEvent, EarningsDate, FinancialStatement, Interval, LineItem, NewsItem,
    PricePoint, PriceSeries, Quote, StatementFrequency, StatementKind, Symbol,
};
use tickerlens_traits::{
    HistoryRange, HistoryRequest, MarketDataProvider, ProviderError, ProviderResult, SourceType,
};

const SOURCE: &str = "demo";
const HISTORY_DAYS: i64 = 5 * 365 + 1;
const MARKET_SEED: u64 = 0x7ACE_2025;
const MARKET_VOL: f64 = 0.16;

/// Parameters of one synthetic instrument.
#[derive(Debug, Clone, Copy)]
struct Profile {
    symbol: &'static str,
    currency: &'static str,
    start_price: f64,
    /// Annual drift.
    drift: f64,
    /// Loading on the market factor.
    beta: f64,
    /// Annual idiosyncratic volatility.
    idio_vol: f64,
    /// Quarterly dividend per share.
    dividend: Option<f64>,
    /// Latest annual revenue; `None` for indices.
    revenue: Option<f64>,
    net_margin: f64,
    shares: f64,
}

const UNIVERSE: &[Profile] = &[
    index("^GSPC", 3_700.0, 0.10, 1.0),
    index("^DJI", 30_500.0, 0.08, 0.9),
    index("^IXIC", 12_800.0, 0.13, 1.2),
    stock("AAPL", 130.0, 0.15, 1.2, 0.18, Some(0.25), 391e9, 0.24, 15.2e9),
    stock("MSFT", 220.0, 0.17, 1.1, 0.16, Some(0.83), 245e9, 0.36, 7.43e9),
    stock("GOOGL", 88.0, 0.16, 1.1, 0.20, Some(0.20), 350e9, 0.28, 12.3e9),
    stock("AMZN", 160.0, 0.09, 1.3, 0.22, None, 638e9, 0.09, 10.6e9),
    stock("NVDA", 13.0, 0.45, 1.8, 0.35, Some(0.01), 130e9, 0.55, 24.5e9),
    stock("TSLA", 240.0, 0.05, 2.0, 0.45, None, 97e9, 0.07, 3.2e9),
];

const fn index(symbol: &'static str, start_price: f64, drift: f64, beta: f64) -> Profile {
    Profile {
        symbol,
        currency: "USD",
        start_price,
        drift,
        beta,
        idio_vol: 0.03,
        dividend: None,
        revenue: None,
        net_margin: 0.0,
        shares: 0.0,
    }
}

#[allow(clippy::too_many_arguments)]
const fn stock(
    symbol: &'static str,
    start_price: f64,
    drift: f64,
    beta: f64,
    idio_vol: f64,
    dividend: Option<f64>,
    revenue: f64,
    net_margin: f64,
    shares: f64,
) -> Profile {
    Profile {
        symbol,
        currency: "USD",
        start_price,
        drift,
        beta,
        idio_vol,
        dividend,
        revenue: Some(revenue),
        net_margin,
        shares,
    }
}

/// SplitMix64; small, fast and good enough for synthetic paths.
struct SplitMix(u64);

impl SplitMix {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Approximately standard normal (Irwin-Hall with 12 terms).
    fn normal(&mut self) -> f64 {
        (0..12).map(|_| self.uniform()).sum::<f64>() - 6.0
    }
}

fn seed_of(symbol: &str) -> u64 {
    // FNV-1a
    symbol
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3))
}

fn is_business_day(date: Date) -> bool {
    // 1970-01-01 was a Thursday; 0 = Monday.
    let weekday = (date.unix_timestamp().div_euclid(86_400) + 3).rem_euclid(7);
    weekday < 5
}

/// The generated market.
#[derive(Debug, Clone)]
pub struct DemoMarket {
    /// Last date of every series.
    pub as_of: Date,
    series: BTreeMap<Symbol, PriceSeries>,
    profiles: BTreeMap<Symbol, Profile>,
}

impl DemoMarket {
    /// Builds the December 2025 market.
    pub fn december_2025() -> ProviderResult<Self> {
        let as_of = Date::from_ymd(2025, 12, 31)?;
        let dates: Vec<Date> = (0..=HISTORY_DAYS)
            .rev()
            .map(|back| as_of.add_days(-back))
            .filter(|d| is_business_day(*d))
            .collect();

        let mut market = SplitMix(MARKET_SEED);
        let factor: Vec<f64> = dates.iter().map(|_| market.normal()).collect();
        let dt = 1.0 / 252.0;

        let mut series = BTreeMap::new();
        let mut profiles = BTreeMap::new();
        for profile in UNIVERSE {
            let symbol = Symbol::parse(profile.symbol)?;
            let mut idio = SplitMix(seed_of(profile.symbol));
            let mut price = profile.start_price;
            let mut points = Vec::with_capacity(dates.len());
            for (date, m) in dates.iter().zip(&factor) {
                points.push(PricePoint {
                    date: *date,
                    price: (price * 100.0).round() / 100.0,
                });
                let shock = profile.beta * MARKET_VOL * m + profile.idio_vol * idio.normal();
                price *= 1.0 + profile.drift * dt + shock * dt.sqrt();
            }
            series.insert(symbol.clone(), PriceSeries::new(symbol.clone(), points)?);
            profiles.insert(symbol, *profile);
        }

        Ok(Self {
            as_of,
            series,
            profiles,
        })
    }

    /// Symbols with data, sorted.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.series.keys().cloned().collect()
    }

    fn series(&self, symbol: &Symbol) -> ProviderResult<&PriceSeries> {
        self.series
            .get(symbol)
            .ok_or_else(|| ProviderError::NotFound(format!("{symbol} (demo universe: {})", self.universe())))
    }

    fn profile(&self, symbol: &Symbol) -> ProviderResult<&Profile> {
        self.profiles
            .get(symbol)
            .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))
    }

    fn universe(&self) -> String {
        self.series.keys().map(Symbol::as_str).collect::<Vec<_>>().join(", ")
    }

    fn company(&self, symbol: &Symbol) -> ProviderResult<(&Profile, f64)> {
        let profile = self.profile(symbol)?;
        let revenue = profile
            .revenue
            .ok_or_else(|| ProviderError::NoData(format!("{symbol} is an index and files no statements")))?;
        Ok((profile, revenue))
    }
}

/// Thins daily closes to the requested bar size, keeping the latest close.
fn resample(series: &PriceSeries, interval: Interval) -> ProviderResult<PriceSeries> {
    let step = match interval {
        Interval::OneDay => return Ok(series.clone()),
        Interval::FiveDays | Interval::OneWeek => 5,
        Interval::OneMonth => 21,
        Interval::ThreeMonths => 63,
    };
    let points = series.points();
    let mut kept: Vec<PricePoint> = points.iter().rev().step_by(step).copied().collect();
    kept.reverse();
    Ok(PriceSeries::new(series.symbol().clone(), kept)?)
}

/// Year-end, quarter-end or as-of dates a statement reports on.
fn reporting_dates(as_of: Date, frequency: StatementFrequency) -> ProviderResult<Vec<Date>> {
    Ok(match frequency {
        StatementFrequency::Yearly => (1..=4)
            .rev()
            .map(|k| Date::from_ymd(as_of.year() - k, 12, 31))
            .collect::<Result<Vec<_>, CoreError>>()?,
        StatementFrequency::Quarterly => {
            let last_quarter_end = Date::from_ymd(as_of.year(), 9, 30)?;
            (0..4)
                .rev()
                .map(|k| last_quarter_end.add_months(-3 * k))
                .collect::<Result<Vec<_>, CoreError>>()?
        }
        StatementFrequency::Trailing => vec![Date::from_ymd(as_of.year(), 9, 30)?],
    })
}

/// Demo market-data provider.
#[derive(Debug, Clone)]
pub struct DemoProvider {
    market: Arc<DemoMarket>,
}

impl DemoProvider {
    /// Provider over the December 2025 market.
    pub fn new() -> ProviderResult<Self> {
        Ok(Self {
            market: Arc::new(DemoMarket::december_2025()?),
        })
    }

    /// The underlying market.
    pub fn market(&self) -> &DemoMarket {
        &self.market
    }
}

#[async_trait]
impl MarketDataProvider for DemoProvider {
    fn name(&self) -> &str {
        SOURCE
    }

    fn source_type(&self) -> SourceType {
        SourceType::Synthetic
    }

    async fn current_price(&self, symbol: &Symbol) -> ProviderResult<Quote> {
        let series = self.market.series(symbol)?;
        let points = series.points();
        let last = points
            .last()
            .ok_or_else(|| ProviderError::NoData(symbol.to_string()))?;
        Ok(Quote {
            symbol: symbol.clone(),
            price: last.price,
            currency: Some(self.market.profile(symbol)?.currency.to_string()),
            previous_close: points.len().checked_sub(2).map(|i| points[i].price),
            timestamp: Some(last.date.unix_timestamp()),
        })
    }

    async fn price_history(&self, request: &HistoryRequest) -> ProviderResult<PriceSeries> {
        let series = self.market.series(&request.symbol)?;
        let selected = match request.range {
            HistoryRange::Between { start, end } => series.between(start, end),
            HistoryRange::Period(period) => match period.start_from(self.market.as_of) {
                Some(start) => series.between(start, self.market.as_of),
                None => series.clone(),
            },
        };
        if selected.is_empty() {
            return Err(ProviderError::NoData(format!(
                "{}: demo data covers the five years to {}",
                request.symbol, self.market.as_of
            )));
        }
        resample(&selected, request.interval)
    }

    async fn dividends(&self, symbol: &Symbol) -> ProviderResult<Vec<DividendEvent>> {
        let profile = self.market.profile(symbol)?;
        let Some(amount) = profile.dividend else {
            return Ok(Vec::new());
        };
        let as_of = self.market.as_of;
        let first = Date::from_ymd(as_of.year() - 4, 2, 10)?;
        let mut events = Vec::new();
        for q in 0..20 {
            let date = first.add_months(3 * q)?;
            if date > as_of {
                break;
            }
            // Raised a little every year.
            let raise = 1.04_f64.powi(q / 4);
            events.push(DividendEvent {
                date,
                amount: (amount / 1.04_f64.powi(4) * raise * 10_000.0).round() / 10_000.0,
            });
        }
        Ok(events)
    }

    async fn financial_statement(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
        frequency: StatementFrequency,
    ) -> ProviderResult<FinancialStatement> {
        let (profile, revenue) = self.market.company(symbol)?;
        let dates = reporting_dates(self.market.as_of, frequency)?;
        let scale = match frequency {
            StatementFrequency::Quarterly => 0.25,
            StatementFrequency::Yearly | StatementFrequency::Trailing => 1.0,
        };

        let mut line_items: BTreeMap<String, Vec<LineItem>> = BTreeMap::new();
        let n = dates.len();
        for (i, as_of) in dates.into_iter().enumerate() {
            // Older periods are smaller, 6% growth per step.
            let growth = 1.06_f64.powi(i as i32 - (n as i32 - 1));
            let rev = revenue * scale * growth;
            let net = rev * profile.net_margin;
            let lines: Vec<(&str, f64)> = match kind {
                StatementKind::Income => vec![
                    ("TotalRevenue", rev.round()),
                    ("GrossProfit", (rev * 0.45).round()),
                    ("OperatingIncome", (net * 1.25).round()),
                    ("NetIncome", net.round()),
                    ("DilutedEPS", (net / profile.shares * 100.0).round() / 100.0),
                ],
                StatementKind::Cashflow => vec![
                    ("OperatingCashFlow", (net * 1.3).round()),
                    ("CapitalExpenditure", (-rev * 0.05).round()),
                    ("FreeCashFlow", (net * 1.3 - rev * 0.05).round()),
                ],
            };
            for (line, value) in lines {
                line_items
                    .entry(line.to_string())
                    .or_default()
                    .push(LineItem { as_of, value });
            }
        }

        Ok(FinancialStatement {
            symbol: symbol.clone(),
            kind,
            frequency,
            line_items,
        })
    }

    async fn earnings_dates(&self, symbol: &Symbol, limit: usize) -> ProviderResult<Vec<EarningsDate>> {
        let (profile, revenue) = self.market.company(symbol)?;
        let quarterly_eps = revenue * profile.net_margin / profile.shares / 4.0;
        let as_of = self.market.as_of;
        let anchor = Date::from_ymd(as_of.year(), 1, 28)?;
        let mut rng = SplitMix(seed_of(symbol.as_str()) ^ 0xEA27);

        // Four upcoming reports and eight past ones, newest first.
        let mut out = Vec::new();
        for q in (-8..4).rev() {
            let date = anchor.add_months(3 * (q + 4))?;
            let estimate = (quarterly_eps * 100.0).round() / 100.0;
            let entry = if date > as_of {
                EarningsDate {
                    date,
                    eps_estimate: Some(estimate),
                    eps_actual: None,
                    surprise_pct: None,
                }
            } else {
                let surprise = (rng.uniform() - 0.35) * 0.1;
                let actual = (estimate * (1.0 + surprise) * 100.0).round() / 100.0;
                EarningsDate {
                    date,
                    eps_estimate: Some(estimate),
                    eps_actual: Some(actual),
                    surprise_pct: Some(((actual / estimate - 1.0) * 10_000.0).round() / 100.0),
                }
            };
            out.push(entry);
        }
        out.truncate(limit);
        Ok(out)
    }

    async fn news(&self, symbol: &Symbol) -> ProviderResult<Vec<NewsItem>> {
        let series = self.market.series(symbol)?;
        let prices = series.prices();
        let change = prices[prices.len() - 1] / prices[0] - 1.0;
        let direction = if change >= 0.0 { "gains" } else { "losses" };
        let published = self.market.as_of.unix_timestamp();
        Ok(vec![
            NewsItem {
                title: format!("{symbol} closes the year with five-year {direction} of {:.0}%", change * 100.0),
                publisher: Some("TickerLens Demo Wire".to_string()),
                link: None,
                published_at: Some(published),
                related_tickers: vec![symbol.to_string()],
            },
            NewsItem {
                title: "Markets head into 2026 after a volatile December".to_string(),
                publisher: Some("TickerLens Demo Wire".to_string()),
                link: None,
                published_at: Some(published - 86_400),
                related_tickers: vec!["^GSPC".to_string(), symbol.to_string()],
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickerlens_core::Period;

    fn sym(s: &str) -> Symbol {
        Symbol::parse(s).unwrap()
    }

    #[test]
    fn test_market_is_deterministic() {
        let a = DemoMarket::december_2025().unwrap();
        let b = DemoMarket::december_2025().unwrap();
        assert_eq!(a.series, b.series);
        assert_eq!(a.symbols().len(), UNIVERSE.len());
    }

    #[test]
    fn test_series_shape() {
        let market = DemoMarket::december_2025().unwrap();
        let aapl = market.series(&sym("AAPL")).unwrap();
        assert!(aapl.len() > 1200 && aapl.len() < 1320);
        assert_eq!(aapl.last().unwrap().date, market.as_of);
        assert!(aapl.prices().iter().all(|p| *p > 0.0));
        assert!(aapl.dates().into_iter().all(is_business_day));
    }

    #[test]
    fn test_business_days() {
        assert!(is_business_day(Date::from_ymd(2025, 12, 31).unwrap())); // Wednesday
        assert!(!is_business_day(Date::from_ymd(2025, 12, 27).unwrap())); // Saturday
        assert!(!is_business_day(Date::from_ymd(2025, 12, 28).unwrap())); // Sunday
    }

    #[tokio::test]
    async fn test_provider_capabilities() {
        let demo = DemoProvider::new().unwrap();
        let request = HistoryRequest::period(sym("TSLA"), Period::SixMonths, Interval::OneDay);
        let six_months = demo.price_history(&request).await.unwrap();
        assert!(six_months.len() > 120 && six_months.len() < 135);

        let weekly = HistoryRequest::period(sym("TSLA"), Period::OneYear, Interval::OneWeek);
        let weekly = demo.price_history(&weekly).await.unwrap();
        assert!(weekly.len() > 50 && weekly.len() < 54);

        assert!(!demo.dividends(&sym("AAPL")).await.unwrap().is_empty());
        assert!(demo.dividends(&sym("TSLA")).await.unwrap().is_empty());

        let income = demo
            .financial_statement(&sym("MSFT"), StatementKind::Income, StatementFrequency::Yearly)
            .await
            .unwrap();
        assert_eq!(income.line_items["NetIncome"].len(), 4);

        let earnings = demo.earnings_dates(&sym("NVDA"), 12).await.unwrap();
        assert_eq!(earnings.len(), 12);
        assert!(earnings.windows(2).all(|w| w[0].date > w[1].date));

        assert!(matches!(
            demo.current_price(&sym("ZZZZ")).await,
            Err(ProviderError::NotFound(_))
        ));
        assert!(matches!(
            demo.financial_statement(&sym("^GSPC"), StatementKind::Income, StatementFrequency::Yearly)
                .await,
            Err(ProviderError::NoData(_))
        ));
    }
}
