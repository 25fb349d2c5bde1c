//! Metric tools: the metrics engine applied to provider history.

use std::collections::BTreeMap;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use rmcp::{tool, tool_router, ErrorData as McpError};
use serde::Serialize;

use tickerlens_core::{
    CorrelationMatrix, Date, MetricResult, PortfolioSpec, PriceSeries, StatementFrequency,
    StatementKind, Symbol,
};
use tickerlens_metrics as engine;
use tickerlens_metrics::{Macd, ValuationInputs, ValuationRatios, RSI_OVERBOUGHT, RSI_OVERSOLD};
use tickerlens_traits::ProviderError;

use crate::error::{ToolError, ToolResult};
use crate::params::{
    parse_symbol, parse_symbols, BetaParams, CorrelationParams, MacdParams, MovingAverageKind,
    MovingAverageParams, PortfolioParams, RsiParams, SeriesParams, SharpeParams, SymbolParams,
    VarMethod, VarParams, VolatilityParams,
};
use crate::server::{json_response, TickerLensMcpServer};

/// An indicator whose values end on the last date of the input.
#[derive(Debug, Serialize)]
struct IndicatorOutput {
    symbol: Symbol,
    indicator: String,
    latest: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    zone: Option<&'static str>,
    values: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
struct MacdOutput {
    symbol: Symbol,
    fast: usize,
    slow: usize,
    signal: usize,
    #[serde(flatten)]
    macd: Macd,
}

#[derive(Debug, Serialize)]
struct ValuationOutput {
    symbol: Symbol,
    price: f64,
    eps: Option<f64>,
    annual_dividends: Option<f64>,
    net_income: Option<f64>,
    revenue: Option<f64>,
    ratios: ValuationRatios,
}

/// Pairs each value with the date it ends on; `values` align to the tail
/// of `dates`.
fn dated(dates: &[Date], values: &[f64]) -> BTreeMap<String, f64> {
    let offset = dates.len().saturating_sub(values.len());
    dates[offset..]
        .iter()
        .zip(values)
        .map(|(d, v)| (d.to_string(), *v))
        .collect()
}

fn bounds(series: &PriceSeries) -> (Option<Date>, Option<Date>) {
    (series.first().map(|p| p.date), series.last().map(|p| p.date))
}

fn single(series: &PriceSeries) -> MetricResult {
    let (start, end) = bounds(series);
    MetricResult::new(vec![series.symbol().clone()], start, end)
}

fn rsi_zone(value: f64) -> &'static str {
    if value >= RSI_OVERBOUGHT {
        "overbought"
    } else if value <= RSI_OVERSOLD {
        "oversold"
    } else {
        "neutral"
    }
}

/// Parses `AAPL:0.6,MSFT:0.4` into weights, or `AAPL,MSFT` into equal weights.
pub(crate) fn parse_holdings(raw: &str) -> ToolResult<PortfolioSpec> {
    let entries: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .collect();
    if entries.is_empty() {
        return Err(ToolError::invalid("holdings must name at least one symbol"));
    }

    let weighted = entries.iter().filter(|e| e.contains(':')).count();
    if weighted == 0 {
        let symbols = parse_symbols(raw)?;
        return Ok(PortfolioSpec::equal_weight(&symbols)?);
    }
    if weighted != entries.len() {
        return Err(ToolError::invalid(
            "holdings must either all carry weights (SYMBOL:WEIGHT) or none",
        ));
    }

    let mut pairs = Vec::with_capacity(entries.len());
    for entry in entries {
        let (symbol, weight) = entry
            .split_once(':')
            .ok_or_else(|| ToolError::invalid(format!("malformed holding '{entry}'")))?;
        let weight: f64 = weight
            .trim()
            .parse()
            .map_err(|_| ToolError::invalid(format!("weight of '{}' is not a number", symbol.trim())))?;
        pairs.push((symbol.trim(), weight));
    }
    Ok(PortfolioSpec::from_pairs(pairs)?)
}

/// Fundamentals the provider may legitimately lack.
fn optional<T>(result: Result<T, ProviderError>) -> ToolResult<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(ProviderError::Unavailable { .. } | ProviderError::NoData(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[tool_router(router = metric_router, vis = "pub(crate)")]
impl TickerLensMcpServer {
    /// Period returns
    #[tool(
        description = "Calculate period returns, total return and annualized return. Window: start_date/end_date or period (default 1y), interval (default 1d)."
    )]
    pub async fn calculate_returns(
        &self,
        Parameters(params): Parameters<SeriesParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.returns_metric(&params).await)
    }

    /// Moving average
    #[tool(
        description = "Calculate a simple or exponential moving average of closing prices over `length` bars."
    )]
    pub async fn calculate_moving_average(
        &self,
        Parameters(params): Parameters<MovingAverageParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.moving_average_metric(&params).await)
    }

    /// RSI
    #[tool(
        description = "Calculate the Relative Strength Index (0-100) with the overbought (>=70) / oversold (<=30) zone of the latest value."
    )]
    pub async fn calculate_rsi(
        &self,
        Parameters(params): Parameters<RsiParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.rsi_metric(&params).await)
    }

    /// MACD
    #[tool(description = "Calculate MACD line, signal line and histogram (default 12/26/9).")]
    pub async fn calculate_macd(
        &self,
        Parameters(params): Parameters<MacdParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.macd_metric(&params).await)
    }

    /// Volatility
    #[tool(
        description = "Calculate annualized volatility (sample standard deviation of returns times sqrt(periods_per_year))."
    )]
    pub async fn calculate_volatility(
        &self,
        Parameters(params): Parameters<VolatilityParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.volatility_metric(&params).await)
    }

    /// Sharpe ratio
    #[tool(
        description = "Calculate the annualized Sharpe ratio for an annual risk_free_rate given as a fraction (0.04 = 4%)."
    )]
    pub async fn calculate_sharpe_ratio(
        &self,
        Parameters(params): Parameters<SharpeParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.sharpe_metric(&params).await)
    }

    /// Max drawdown
    #[tool(description = "Calculate the maximum peak-to-trough decline as a positive fraction.")]
    pub async fn calculate_max_drawdown(
        &self,
        Parameters(params): Parameters<SeriesParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.drawdown_metric(&params).await)
    }

    /// Value at risk
    #[tool(
        description = "Calculate one-period Value at Risk (historical or parametric) and expected shortfall, reported as returns (negative = loss)."
    )]
    pub async fn calculate_value_at_risk(
        &self,
        Parameters(params): Parameters<VarParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.var_metric(&params).await)
    }

    /// Beta
    #[tool(
        description = "Calculate beta of a symbol against a benchmark (default ^GSPC) over the dates both share."
    )]
    pub async fn calculate_beta(
        &self,
        Parameters(params): Parameters<BetaParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.beta_metric(&params).await)
    }

    /// Correlation matrix
    #[tool(
        description = "Calculate the Pearson correlation matrix of comma-separated symbols over each pair's common dates, on returns (default) or prices."
    )]
    pub async fn calculate_correlation_matrix(
        &self,
        Parameters(params): Parameters<CorrelationParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.correlation_metric(&params).await)
    }

    /// Portfolio performance
    #[tool(
        description = "Calculate performance of a weighted portfolio. holdings: 'AAPL:0.6,MSFT:0.4' (weights are normalized) or 'AAPL,MSFT' for equal weights."
    )]
    pub async fn calculate_portfolio_performance(
        &self,
        Parameters(params): Parameters<PortfolioParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.portfolio_metric(&params).await)
    }

    /// Valuation ratios
    #[tool(
        description = "Get P/E, earnings yield, dividend yield, payout ratio and profit margin from the current price, the latest yearly income statement and trailing dividends."
    )]
    pub async fn get_valuation_ratios(
        &self,
        Parameters(params): Parameters<SymbolParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.valuation(&params.symbol).await)
    }
}

impl TickerLensMcpServer {
    async fn series_for(&self, params: &SeriesParams) -> ToolResult<PriceSeries> {
        self.history(parse_symbol(&params.symbol)?, &params.window).await
    }

    async fn returns_metric(&self, params: &SeriesParams) -> ToolResult<MetricResult> {
        let series = self.series_for(params).await?;
        let returns = engine::compute_returns(&series)?;
        let ppy = params.window.periods_per_year(None)?;
        Ok(single(&series)
            .with("total_return", engine::total_return(&returns.values)?)
            .with("annualized_return", engine::annualized_return(&returns.values, ppy)?)
            .with("returns", returns.values))
    }

    async fn moving_average_metric(&self, params: &MovingAverageParams) -> ToolResult<IndicatorOutput> {
        let series = self.history(parse_symbol(&params.symbol)?, &params.window).await?;
        let (indicator, values) = match params.kind {
            MovingAverageKind::Simple => (
                format!("SMA({})", params.length),
                engine::moving_average(&series, params.length)?,
            ),
            MovingAverageKind::Exponential => (
                format!("EMA({})", params.length),
                engine::exponential_moving_average(&series.prices(), params.length)?,
            ),
        };
        Ok(IndicatorOutput {
            symbol: series.symbol().clone(),
            indicator,
            latest: values.last().copied(),
            zone: None,
            values: dated(&series.dates(), &values),
        })
    }

    async fn rsi_metric(&self, params: &RsiParams) -> ToolResult<IndicatorOutput> {
        let series = self.history(parse_symbol(&params.symbol)?, &params.window).await?;
        let values = engine::rsi(&series, params.length)?;
        let latest = values.last().copied();
        Ok(IndicatorOutput {
            symbol: series.symbol().clone(),
            indicator: format!("RSI({})", params.length),
            latest,
            zone: latest.map(rsi_zone),
            values: dated(&series.dates(), &values),
        })
    }

    async fn macd_metric(&self, params: &MacdParams) -> ToolResult<MacdOutput> {
        let series = self.history(parse_symbol(&params.symbol)?, &params.window).await?;
        let macd = engine::macd(&series, params.fast, params.slow, params.signal)?;
        Ok(MacdOutput {
            symbol: series.symbol().clone(),
            fast: params.fast,
            slow: params.slow,
            signal: params.signal,
            macd,
        })
    }

    async fn volatility_metric(&self, params: &VolatilityParams) -> ToolResult<MetricResult> {
        let series = self.history(parse_symbol(&params.symbol)?, &params.window).await?;
        let ppy = params.window.periods_per_year(params.periods_per_year)?;
        let returns = engine::compute_returns(&series)?;
        Ok(single(&series)
            .with("annualized_volatility", engine::annualized_volatility(&returns.values, ppy)?)
            .with("periods_per_year", ppy))
    }

    async fn sharpe_metric(&self, params: &SharpeParams) -> ToolResult<MetricResult> {
        let series = self.history(parse_symbol(&params.symbol)?, &params.window).await?;
        let ppy = params.window.periods_per_year(params.periods_per_year)?;
        let returns = engine::compute_returns(&series)?;
        Ok(single(&series)
            .with(
                "sharpe_ratio",
                engine::sharpe_ratio(&returns.values, params.risk_free_rate, ppy)?,
            )
            .with("risk_free_rate", params.risk_free_rate)
            .with("periods_per_year", ppy))
    }

    async fn drawdown_metric(&self, params: &SeriesParams) -> ToolResult<MetricResult> {
        let series = self.series_for(params).await?;
        Ok(single(&series).with("max_drawdown", engine::max_drawdown(&series)?))
    }

    async fn var_metric(&self, params: &VarParams) -> ToolResult<MetricResult> {
        let series = self.history(parse_symbol(&params.symbol)?, &params.window).await?;
        let returns = engine::compute_returns(&series)?;
        let var = match params.method {
            VarMethod::Historical => engine::value_at_risk(&returns.values, params.confidence)?,
            VarMethod::Parametric => engine::parametric_var(&returns.values, params.confidence)?,
        };
        Ok(single(&series)
            .with("value_at_risk", var)
            .with(
                "expected_shortfall",
                engine::expected_shortfall(&returns.values, params.confidence)?,
            )
            .with("confidence", params.confidence))
    }

    async fn beta_metric(&self, params: &BetaParams) -> ToolResult<MetricResult> {
        let symbol = parse_symbol(&params.symbol)?;
        let market_symbol = parse_symbol(&params.market_symbol)?;
        let asset = self.history(symbol.clone(), &params.window).await?;
        let market = self.history(market_symbol.clone(), &params.window).await?;

        let dates = engine::common_dates(&[&asset, &market]);
        let asset = asset.restricted_to(&dates);
        let market = market.restricted_to(&dates);
        let asset_returns = engine::compute_returns(&asset)?;
        let market_returns = engine::compute_returns(&market)?;

        let (start, end) = bounds(&asset);
        Ok(MetricResult::new(vec![symbol, market_symbol], start, end)
            .with("beta", engine::beta(&asset_returns.values, &market_returns.values)?)
            .with("observations", asset_returns.len() as f64))
    }

    async fn correlation_metric(&self, params: &CorrelationParams) -> ToolResult<CorrelationMatrix> {
        let symbols = parse_symbols(&params.symbols)?;
        let series = self.histories(&symbols, &params.window).await?;
        Ok(engine::correlation_matrix_with(&series, params.basis.into())?)
    }

    async fn portfolio_metric(&self, params: &PortfolioParams) -> ToolResult<MetricResult> {
        let spec = parse_holdings(&params.holdings)?;
        let symbols: Vec<Symbol> = spec.symbols().cloned().collect();
        let series = self.histories(&symbols, &params.window).await?;
        let ppy = params.window.periods_per_year(params.periods_per_year)?;
        Ok(engine::portfolio_performance(
            &series,
            &spec,
            params.risk_free_rate,
            ppy,
        )?)
    }

    async fn valuation(&self, symbol: &str) -> ToolResult<ValuationOutput> {
        let symbol = parse_symbol(symbol)?;
        let provider = self.provider();
        let quote = provider.current_price(&symbol).await?;

        let income = optional(
            provider
                .financial_statement(&symbol, StatementKind::Income, StatementFrequency::Yearly)
                .await,
        )?;
        let latest = |line: &str| {
            income
                .as_ref()
                .and_then(|s| s.latest(line))
                .map(|item| item.value)
        };
        let eps = latest("DilutedEPS").or_else(|| latest("BasicEPS"));
        let net_income = latest("NetIncome");
        let revenue = latest("TotalRevenue");

        let as_of = match quote.timestamp {
            Some(ts) => Date::from_unix_timestamp(ts, 0)?,
            None => Date::today(),
        };
        let annual_dividends = match optional(provider.dividends(&symbol).await)? {
            Some(events) => Some(engine::trailing_dividends(&events, as_of)?),
            None => None,
        };

        let ratios = engine::valuation_ratios(&ValuationInputs {
            price: quote.price,
            eps,
            annual_dividends,
            net_income,
            revenue,
        })?;
        Ok(ValuationOutput {
            symbol,
            price: quote.price,
            eps,
            annual_dividends,
            net_income,
            revenue,
            ratios,
        })
    }
}
