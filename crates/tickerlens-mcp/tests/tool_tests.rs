//! Tool handlers exercised end to end over the demo and CSV providers.

use std::fs;

use approx::assert_relative_eq;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, ErrorCode};
use rmcp::ErrorData as McpError;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tempfile::TempDir;

use tickerlens_ext_file::create_file_market_data;
use tickerlens_mcp::config::{ProviderKind, ServerConfig};
use tickerlens_mcp::TickerLensMcpServer;

fn demo() -> TickerLensMcpServer {
    TickerLensMcpServer::with_demo_mode().unwrap()
}

fn params<T: DeserializeOwned>(value: Value) -> Parameters<T> {
    Parameters(serde_json::from_value(value).unwrap())
}

fn text(result: Result<CallToolResult, McpError>) -> String {
    let result = result.unwrap();
    result.content[0].as_text().unwrap().text.clone()
}

fn json_of(result: Result<CallToolResult, McpError>) -> Value {
    serde_json::from_str(&text(result)).unwrap()
}

fn error_kind(result: Result<CallToolResult, McpError>) -> (ErrorCode, String) {
    let err = result.unwrap_err();
    let kind = err.data.as_ref().unwrap()["kind"].as_str().unwrap().to_string();
    (err.code, kind)
}

/// A CSV directory with a trending and a constant series.
fn csv_server() -> (TempDir, TickerLensMcpServer) {
    let dir = TempDir::new().unwrap();
    let mut trend = String::from("date,close\n");
    let mut flat = String::from("date,close\n");
    for day in 1..=28 {
        trend.push_str(&format!("2025-02-{day:02},{}\n", 100.0 + f64::from(day) + f64::from(day % 3)));
        flat.push_str(&format!("2025-02-{day:02},50.0\n"));
    }
    fs::write(dir.path().join("UP.csv"), trend).unwrap();
    fs::write(dir.path().join("FLAT.csv"), flat).unwrap();
    let provider = create_file_market_data(dir.path()).unwrap();
    (dir, TickerLensMcpServer::new(provider))
}

// ============================================================================
// Market data
// ============================================================================

#[tokio::test]
async fn test_current_price_is_last_close_with_four_decimals() {
    let server = demo();
    let out = text(
        server
            .get_current_stock_price(params(json!({"symbol": "aapl"})))
            .await,
    );
    let last = json_of(
        server
            .get_stock_price_date_range(params(json!({
                "symbol": "AAPL",
                "start_date": "2025-12-31",
                "end_date": "2025-12-31"
            })))
            .await,
    );
    assert_eq!(out, format!("{:.4}", last["2025-12-31"].as_f64().unwrap()));
    let (_, decimals) = out.split_once('.').unwrap();
    assert_eq!(decimals.len(), 4);
}

#[tokio::test]
async fn test_price_by_date_rolls_to_next_session() {
    let server = demo();
    let saturday = text(
        server
            .get_stock_price_by_date(params(json!({"symbol": "MSFT", "date": "2025-12-27"})))
            .await,
    );
    let range = json_of(
        server
            .get_stock_price_date_range(params(json!({
                "symbol": "MSFT",
                "start_date": "2025-12-29",
                "end_date": "2025-12-29"
            })))
            .await,
    );
    let monday = range["2025-12-29"].as_f64().unwrap();
    assert_eq!(saturday, format!("{monday:.4}"));
}

#[tokio::test]
async fn test_date_range_is_inclusive() {
    let range = json_of(
        demo()
            .get_stock_price_date_range(params(json!({
                "symbol": "NVDA",
                "start_date": "2025-12-01",
                "end_date": "2025-12-05"
            })))
            .await,
    );
    let keys: Vec<&String> = range.as_object().unwrap().keys().collect();
    assert_eq!(
        keys,
        ["2025-12-01", "2025-12-02", "2025-12-03", "2025-12-04", "2025-12-05"]
    );
}

#[tokio::test]
async fn test_historical_prices_default_to_one_month() {
    let history = json_of(
        demo()
            .get_historical_stock_prices(params(json!({"symbol": "^GSPC"})))
            .await,
    );
    let n = history.as_object().unwrap().len();
    assert!((19..=24).contains(&n), "got {n} closes");
}

#[tokio::test]
async fn test_statements_and_calendar() {
    let server = demo();
    let income = json_of(
        server
            .get_income_statement(params(json!({"symbol": "MSFT"})))
            .await,
    );
    let periods: Vec<&String> = income.as_object().unwrap().keys().collect();
    assert_eq!(periods, ["2021-12-31", "2022-12-31", "2023-12-31", "2024-12-31"]);
    assert!(income["2024-12-31"]["NetIncome"].as_f64().unwrap() > 0.0);

    let cashflow = json_of(
        server
            .get_cashflow(params(json!({"symbol": "MSFT", "freq": "quarterly"})))
            .await,
    );
    assert_eq!(cashflow.as_object().unwrap().len(), 4);

    let earnings = json_of(
        server
            .get_earning_dates(params(json!({"symbol": "AAPL", "limit": 3})))
            .await,
    );
    assert_eq!(earnings.as_array().unwrap().len(), 3);

    let dividends = json_of(server.get_dividends(params(json!({"symbol": "AAPL"}))).await);
    assert!(!dividends.as_object().unwrap().is_empty());

    let news = json_of(server.get_news(params(json!({"symbol": "TSLA"}))).await);
    assert!(news[0]["title"].as_str().unwrap().contains("TSLA"));
}

#[tokio::test]
async fn test_caller_errors_are_invalid_params() {
    let server = demo();

    let (code, kind) = error_kind(
        server
            .get_current_stock_price(params(json!({"symbol": "NOPE"})))
            .await,
    );
    assert_eq!(code, ErrorCode::INVALID_PARAMS);
    assert_eq!(kind, "not_found");

    let (code, kind) = error_kind(
        server
            .get_stock_price_by_date(params(json!({"symbol": "AAPL", "date": "12/27/2025"})))
            .await,
    );
    assert_eq!(code, ErrorCode::INVALID_PARAMS);
    assert_eq!(kind, "invalid_input");

    let (_, kind) = error_kind(
        server
            .get_current_stock_price(params(json!({"symbol": "AA PL"})))
            .await,
    );
    assert_eq!(kind, "invalid_input");
}

#[tokio::test]
async fn test_unavailable_capability_is_upstream() {
    let (_dir, server) = csv_server();
    let (code, kind) = error_kind(
        server
            .get_income_statement(params(json!({"symbol": "UP"})))
            .await,
    );
    assert_eq!(code, ErrorCode::INTERNAL_ERROR);
    assert_eq!(kind, "upstream");
}

// ============================================================================
// Metrics
// ============================================================================

#[tokio::test]
async fn test_returns_match_price_range() {
    let server = demo();
    let window = json!({"symbol": "AMZN", "start_date": "2025-06-02", "end_date": "2025-06-30"});
    let prices = json_of(server.get_stock_price_date_range(params(window.clone())).await);
    let closes: Vec<f64> = prices
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_f64().unwrap())
        .collect();

    let result = json_of(server.calculate_returns(params(window)).await);
    let returns = result["metrics"]["returns"].as_array().unwrap();
    assert_eq!(returns.len(), closes.len() - 1);
    assert_relative_eq!(
        returns[0].as_f64().unwrap(),
        closes[1] / closes[0] - 1.0,
        epsilon = 1e-12
    );
    assert_relative_eq!(
        result["metrics"]["total_return"].as_f64().unwrap(),
        closes[closes.len() - 1] / closes[0] - 1.0,
        epsilon = 1e-9
    );
    assert_eq!(result["start"], "2025-06-02");
    assert_eq!(result["end"], "2025-06-30");
}

#[tokio::test]
async fn test_indicators() {
    let server = demo();

    let ma = json_of(
        server
            .calculate_moving_average(params(json!({"symbol": "AAPL", "period": "3mo", "length": 10})))
            .await,
    );
    assert_eq!(ma["indicator"], "SMA(10)");
    let last_key = ma["values"].as_object().unwrap().keys().last().unwrap().clone();
    assert_eq!(last_key, "2025-12-31");

    let ema = json_of(
        server
            .calculate_moving_average(params(
                json!({"symbol": "AAPL", "period": "3mo", "length": 10, "kind": "exponential"}),
            ))
            .await,
    );
    assert_eq!(ema["values"].as_object().unwrap().len(), ma["values"].as_object().unwrap().len());

    let rsi = json_of(server.calculate_rsi(params(json!({"symbol": "TSLA"}))).await);
    assert!(rsi["values"]
        .as_object()
        .unwrap()
        .values()
        .all(|v| (0.0..=100.0).contains(&v.as_f64().unwrap())));
    assert!(["overbought", "oversold", "neutral"].contains(&rsi["zone"].as_str().unwrap()));

    let macd = json_of(server.calculate_macd(params(json!({"symbol": "TSLA"}))).await);
    assert_eq!(macd["slow"], 26);
    let n = macd["dates"].as_array().unwrap().len();
    assert_eq!(macd["histogram"].as_array().unwrap().len(), n);
}

#[tokio::test]
async fn test_oversized_arguments_are_invalid_input() {
    let server = demo();

    let (code, kind) = error_kind(
        server
            .calculate_rsi(params(json!({"symbol": "TSLA", "length": usize::MAX})))
            .await,
    );
    assert_eq!(code, ErrorCode::INVALID_PARAMS);
    assert_eq!(kind, "invalid_input");

    let (code, kind) = error_kind(
        server
            .calculate_macd(params(json!({"symbol": "TSLA", "signal": usize::MAX})))
            .await,
    );
    assert_eq!(code, ErrorCode::INVALID_PARAMS);
    assert_eq!(kind, "invalid_input");

    let (code, kind) = error_kind(
        server
            .calculate_portfolio_performance(params(
                json!({"holdings": "AAPL:1e308,MSFT:1e308"}),
            ))
            .await,
    );
    assert_eq!(code, ErrorCode::INVALID_PARAMS);
    assert_eq!(kind, "invalid_input");
}

#[tokio::test]
async fn test_risk_metrics() {
    let server = demo();

    let vol = json_of(server.calculate_volatility(params(json!({"symbol": "NVDA"}))).await);
    let nvda_vol = vol["metrics"]["annualized_volatility"].as_f64().unwrap();
    let index_vol = json_of(server.calculate_volatility(params(json!({"symbol": "^GSPC"}))).await)
        ["metrics"]["annualized_volatility"]
        .as_f64()
        .unwrap();
    assert!(nvda_vol > index_vol);

    let weekly = json_of(
        server
            .calculate_volatility(params(json!({"symbol": "NVDA", "interval": "1wk"})))
            .await,
    );
    assert_eq!(weekly["metrics"]["periods_per_year"], 52.0);

    let sharpe = json_of(
        server
            .calculate_sharpe_ratio(params(json!({"symbol": "MSFT", "risk_free_rate": 0.04})))
            .await,
    );
    assert!(sharpe["metrics"]["sharpe_ratio"].as_f64().unwrap().is_finite());

    let dd = json_of(server.calculate_max_drawdown(params(json!({"symbol": "TSLA", "period": "5y"}))).await);
    let dd = dd["metrics"]["max_drawdown"].as_f64().unwrap();
    assert!(dd > 0.0 && dd < 1.0);

    let var = json_of(server.calculate_value_at_risk(params(json!({"symbol": "AAPL"}))).await);
    let value_at_risk = var["metrics"]["value_at_risk"].as_f64().unwrap();
    let shortfall = var["metrics"]["expected_shortfall"].as_f64().unwrap();
    assert!(value_at_risk < 0.0);
    assert!(shortfall <= value_at_risk);

    let parametric = json_of(
        server
            .calculate_value_at_risk(params(json!({"symbol": "AAPL", "method": "parametric", "confidence": 0.99})))
            .await,
    );
    assert!(parametric["metrics"]["value_at_risk"].as_f64().unwrap() < 0.0);
}

#[tokio::test]
async fn test_beta_and_correlation() {
    let server = demo();

    let self_beta = json_of(
        server
            .calculate_beta(params(json!({"symbol": "^GSPC", "market_symbol": "^GSPC"})))
            .await,
    );
    assert_relative_eq!(self_beta["metrics"]["beta"].as_f64().unwrap(), 1.0, epsilon = 1e-12);

    let nvda = json_of(server.calculate_beta(params(json!({"symbol": "NVDA", "period": "2y"}))).await);
    assert!(nvda["metrics"]["beta"].as_f64().unwrap() > 1.0);
    assert_eq!(nvda["symbols"], json!(["NVDA", "^GSPC"]));

    let matrix = json_of(
        server
            .calculate_correlation_matrix(params(json!({"symbols": "AAPL,MSFT,^GSPC"})))
            .await,
    );
    for a in ["AAPL", "MSFT", "^GSPC"] {
        assert_relative_eq!(matrix[a][a].as_f64().unwrap(), 1.0, epsilon = 1e-12);
        for b in ["AAPL", "MSFT", "^GSPC"] {
            assert_eq!(matrix[a][b], matrix[b][a]);
        }
    }
    assert!(matrix["AAPL"]["^GSPC"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_degenerate_series() {
    let (_dir, server) = csv_server();

    let (code, kind) = error_kind(
        server
            .calculate_correlation_matrix(params(json!({"symbols": "UP,FLAT", "period": "max"})))
            .await,
    );
    assert_eq!(code, ErrorCode::INVALID_PARAMS);
    assert_eq!(kind, "numeric_degenerate");

    let (_, kind) = error_kind(
        server
            .calculate_sharpe_ratio(params(json!({"symbol": "FLAT", "period": "max"})))
            .await,
    );
    assert_eq!(kind, "invalid_input");

    let rsi = json_of(
        server
            .calculate_rsi(params(json!({"symbol": "FLAT", "period": "max"})))
            .await,
    );
    assert_eq!(rsi["latest"], 100.0);

    let dd = json_of(
        server
            .calculate_max_drawdown(params(json!({"symbol": "FLAT", "period": "max"})))
            .await,
    );
    assert_eq!(dd["metrics"]["max_drawdown"], 0.0);
}

#[tokio::test]
async fn test_portfolio_performance() {
    let server = demo();
    let weighted = json_of(
        server
            .calculate_portfolio_performance(params(json!({"holdings": "AAPL:3,MSFT:1"})))
            .await,
    );
    let value = weighted["metrics"]["value"].as_array().unwrap();
    let returns = weighted["metrics"]["returns"].as_array().unwrap();
    assert_eq!(value.len(), returns.len() + 1);
    assert_eq!(value[0], 1.0);
    assert_relative_eq!(
        weighted["metrics"]["total_return"].as_f64().unwrap(),
        value[value.len() - 1].as_f64().unwrap() - 1.0,
        epsilon = 1e-9
    );

    let equal = json_of(
        server
            .calculate_portfolio_performance(params(json!({"holdings": "AAPL,MSFT", "period": "6mo"})))
            .await,
    );
    assert!(equal["metrics"]["sharpe_ratio"].as_f64().is_some());

    let (_, kind) = error_kind(
        server
            .calculate_portfolio_performance(params(json!({"holdings": "AAPL:1,MSFT"})))
            .await,
    );
    assert_eq!(kind, "invalid_input");
}

#[tokio::test]
async fn test_valuation_ratios() {
    let server = demo();
    let aapl = json_of(server.get_valuation_ratios(params(json!({"symbol": "AAPL"}))).await);
    let pe = aapl["ratios"]["price_to_earnings"].as_f64().unwrap();
    let price = aapl["price"].as_f64().unwrap();
    let eps = aapl["eps"].as_f64().unwrap();
    assert_relative_eq!(pe, price / eps, epsilon = 1e-9);
    assert!(aapl["ratios"]["dividend_yield"].as_f64().unwrap() > 0.0);
    assert!(aapl["ratios"]["profit_margin"].as_f64().unwrap() > 0.0);

    // Indices file no statements; only the price-based inputs remain.
    let index = json_of(server.get_valuation_ratios(params(json!({"symbol": "^DJI"}))).await);
    assert!(index["eps"].is_null());
    assert!(index["ratios"]["price_to_earnings"].is_null());

    // CSV has prices but no statements.
    let (_dir, csv) = csv_server();
    let up = json_of(csv.get_valuation_ratios(params(json!({"symbol": "UP"}))).await);
    assert!(up["revenue"].is_null());
}

// ============================================================================
// Charts
// ============================================================================

#[tokio::test]
async fn test_chart_tools_render_svg() {
    let server = demo();
    for svg in [
        text(server.generate_market_dashboard(params(json!({}))).await),
        text(server.generate_portfolio_report(params(json!({}))).await),
        text(server.generate_stock_technical_analysis(params(json!({}))).await),
    ] {
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    let (_, kind) = error_kind(
        server
            .generate_stock_technical_analysis(params(json!({"symbol": "AAPL", "period": "1mo"})))
            .await,
    );
    assert_eq!(kind, "invalid_input");
}

// ============================================================================
// Configuration
// ============================================================================

#[tokio::test]
async fn test_server_from_csv_config() {
    let (dir, _) = csv_server();
    let mut config = ServerConfig::default();
    config.provider.kind = ProviderKind::Csv;
    config.provider.data_dir = Some(dir.path().to_path_buf());

    let server = TickerLensMcpServer::from_config(&config).unwrap();
    assert!(!server.is_demo_mode());
    assert_eq!(server.provider().name(), "csv");
    let price = text(server.get_current_stock_price(params(json!({"symbol": "UP"}))).await);
    assert_eq!(price, "129.0000");
}
