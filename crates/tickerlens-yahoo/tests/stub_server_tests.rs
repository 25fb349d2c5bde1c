//! Provider tests against an in-process stand-in for Yahoo's endpoints.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use tickerlens_core::{Date, Interval, Period, StatementFrequency, StatementKind, Symbol};
use tickerlens_traits::{HistoryRequest, MarketDataProvider, ProviderError};
use tickerlens_yahoo::{YahooConfig, YahooProvider};

const CHART: &str = r#"{"chart":{"result":[{
    "meta":{"currency":"USD","symbol":"AAPL","regularMarketPrice":243.36,"gmtoffset":-18000},
    "timestamp":[1735828200,1735914600,1736173800],
    "indicators":{"quote":[{"close":[243.85,243.36,245.0]}]},
    "events":{"dividends":{"1731335400":{"amount":0.25,"date":1731335400}}}
}],"error":null}}"#;

const NOT_FOUND: &str = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

const SUMMARY: &str = r#"{"quoteSummary":{"result":[{"earningsHistory":{"history":[
    {"quarter":{"raw":1735603200},"epsActual":{"raw":2.4},"epsEstimate":{"raw":2.35},"surprisePercent":{"raw":0.02}}
]}}],"error":null}}"#;

const FUNDAMENTALS: &str = r#"{"timeseries":{"result":[
    {"meta":{"type":["annualNetIncome"]},"annualNetIncome":[{"asOfDate":"2024-09-30","reportedValue":{"raw":93736000000}}]}
],"error":null}}"#;

#[derive(Default)]
struct Counters {
    crumbs: AtomicUsize,
    summaries: AtomicUsize,
}

async fn chart(Path(symbol): Path<String>) -> impl IntoResponse {
    if symbol == "AAPL" {
        (StatusCode::OK, CHART)
    } else {
        (StatusCode::NOT_FOUND, NOT_FOUND)
    }
}

async fn crumb(State(counters): State<Arc<Counters>>) -> impl IntoResponse {
    let n = counters.crumbs.fetch_add(1, Ordering::SeqCst);
    format!("crumb{n}")
}

async fn summary(
    State(counters): State<Arc<Counters>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    counters.summaries.fetch_add(1, Ordering::SeqCst);
    // The first crumb handed out is rejected so the provider has to refresh.
    match params.get("crumb").map(String::as_str) {
        Some("crumb0") | None => (StatusCode::UNAUTHORIZED, "Invalid Crumb"),
        Some(_) => (StatusCode::OK, SUMMARY),
    }
}

async fn spawn_stub() -> (String, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    let app = Router::new()
        .route("/", get(|| async { StatusCode::NOT_FOUND }))
        .route("/v8/finance/chart/{symbol}", get(chart))
        .route("/v1/test/getcrumb", get(crumb))
        .route("/v10/finance/quoteSummary/{symbol}", get(summary))
        .route(
            "/ws/fundamentals-timeseries/v1/finance/timeseries/{symbol}",
            get(|| async { FUNDAMENTALS }),
        )
        .route(
            "/v1/finance/search",
            get(|| async { r#"{"news":[{"title":"Headline","relatedTickers":["AAPL"]}]}"# }),
        )
        .with_state(counters.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), counters)
}

fn provider(base: &str) -> YahooProvider {
    YahooProvider::new(YahooConfig::with_base_url(base)).unwrap()
}

fn aapl() -> Symbol {
    Symbol::parse("AAPL").unwrap()
}

#[tokio::test]
async fn test_price_history_and_quote() {
    let (base, _) = spawn_stub().await;
    let yahoo = provider(&base);

    let request = HistoryRequest::period(aapl(), Period::OneMonth, Interval::OneDay);
    let series = yahoo.price_history(&request).await.unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.first().unwrap().date, Date::from_ymd(2025, 1, 2).unwrap());

    let quote = yahoo.current_price(&aapl()).await.unwrap();
    assert_eq!(quote.price, 243.36);

    let divs = yahoo.dividends(&aapl()).await.unwrap();
    assert_eq!(divs.len(), 1);
}

#[tokio::test]
async fn test_between_trims_to_window() {
    let (base, _) = spawn_stub().await;
    let yahoo = provider(&base);
    let day = Date::from_ymd(2025, 1, 3).unwrap();
    let request = HistoryRequest::between(aapl(), day, day, Interval::OneDay).unwrap();
    let series = yahoo.price_history(&request).await.unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series.prices(), vec![243.36]);

    let point = yahoo
        .price_on_or_after(&aapl(), Date::from_ymd(2025, 1, 4).unwrap())
        .await
        .unwrap();
    assert_eq!(point.date, Date::from_ymd(2025, 1, 6).unwrap());
}

#[tokio::test]
async fn test_unknown_symbol() {
    let (base, _) = spawn_stub().await;
    let err = provider(&base)
        .current_price(&Symbol::parse("ZZZZZ").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::NotFound(_)));
}

#[tokio::test]
async fn test_crumb_refreshed_once_on_401() {
    let (base, counters) = spawn_stub().await;
    let yahoo = provider(&base);
    let dates = yahoo.earnings_dates(&aapl(), 4).await.unwrap();
    assert_eq!(dates.len(), 1);
    assert_eq!(counters.crumbs.load(Ordering::SeqCst), 2);
    assert_eq!(counters.summaries.load(Ordering::SeqCst), 2);

    // The refreshed crumb is cached for the next call.
    yahoo.earnings_dates(&aapl(), 4).await.unwrap();
    assert_eq!(counters.crumbs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_statement_and_news() {
    let (base, _) = spawn_stub().await;
    let yahoo = provider(&base);
    let stmt = yahoo
        .financial_statement(&aapl(), StatementKind::Income, StatementFrequency::Yearly)
        .await
        .unwrap();
    assert_eq!(stmt.latest("NetIncome").unwrap().value, 93_736_000_000.0);

    let news = yahoo.news(&aapl()).await.unwrap();
    assert_eq!(news[0].title, "Headline");
}
