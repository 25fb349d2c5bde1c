//! Market data pass-through tools.

use std::collections::BTreeMap;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use rmcp::{tool, tool_router, ErrorData as McpError};

use tickerlens_core::{EarningsDate, NewsItem, StatementFrequency, StatementKind};
use tickerlens_traits::HistoryRequest;

use crate::error::ToolResult;
use crate::params::{
    parse_date, parse_symbol, DateRangeParams, EarningsParams, HistoricalParams,
    PriceByDateParams, StatementParams, SymbolParams,
};
use crate::server::{json_response, text_response, TickerLensMcpServer};

/// Statement keyed by period end date, then line item.
type StatementTable = BTreeMap<String, BTreeMap<String, f64>>;

#[tool_router(router = data_router, vis = "pub(crate)")]
impl TickerLensMcpServer {
    /// Latest price
    #[tool(description = "Get the current price of a stock or index, formatted with 4 decimals.")]
    pub async fn get_current_stock_price(
        &self,
        Parameters(params): Parameters<SymbolParams>,
    ) -> Result<CallToolResult, McpError> {
        text_response(self.current_price_text(&params.symbol).await)
    }

    /// Close on a date
    #[tool(
        description = "Get the closing price on a date (YYYY-MM-DD). Weekends and holidays resolve to the next trading day."
    )]
    pub async fn get_stock_price_by_date(
        &self,
        Parameters(params): Parameters<PriceByDateParams>,
    ) -> Result<CallToolResult, McpError> {
        text_response(self.price_by_date_text(&params).await)
    }

    /// Closes between two dates
    #[tool(
        description = "Get daily closing prices between start_date and end_date (inclusive) as a JSON object mapping YYYY-MM-DD to price."
    )]
    pub async fn get_stock_price_date_range(
        &self,
        Parameters(params): Parameters<DateRangeParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.date_range_prices(&params).await)
    }

    /// Closes over a period
    #[tool(
        description = "Get historical closing prices over a period (1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max) at an interval (1d, 5d, 1wk, 1mo, 3mo)."
    )]
    pub async fn get_historical_stock_prices(
        &self,
        Parameters(params): Parameters<HistoricalParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.historical_prices(&params).await)
    }

    /// Dividend history
    #[tool(description = "Get the dividend history as a JSON object mapping payment date to amount.")]
    pub async fn get_dividends(
        &self,
        Parameters(params): Parameters<SymbolParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.dividend_table(&params.symbol).await)
    }

    /// Income statement
    #[tool(
        description = "Get the income statement (yearly, quarterly or trailing) keyed by period end date."
    )]
    pub async fn get_income_statement(
        &self,
        Parameters(params): Parameters<StatementParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(
            self.statement_table(&params.symbol, StatementKind::Income, params.freq)
                .await,
        )
    }

    /// Cash-flow statement
    #[tool(
        description = "Get the cash-flow statement (yearly, quarterly or trailing) keyed by period end date."
    )]
    pub async fn get_cashflow(
        &self,
        Parameters(params): Parameters<StatementParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(
            self.statement_table(&params.symbol, StatementKind::Cashflow, params.freq)
                .await,
        )
    }

    /// Earnings calendar
    #[tool(
        description = "Get past and upcoming earnings dates with EPS estimate, actual and surprise, newest first."
    )]
    pub async fn get_earning_dates(
        &self,
        Parameters(params): Parameters<EarningsParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.earnings(&params).await)
    }

    /// Headlines
    #[tool(description = "Get recent news headlines for a symbol.")]
    pub async fn get_news(
        &self,
        Parameters(params): Parameters<SymbolParams>,
    ) -> Result<CallToolResult, McpError> {
        json_response(self.headlines(&params.symbol).await)
    }
}

impl TickerLensMcpServer {
    async fn current_price_text(&self, symbol: &str) -> ToolResult<String> {
        let quote = self.provider().current_price(&parse_symbol(symbol)?).await?;
        Ok(format!("{:.4}", quote.price))
    }

    async fn price_by_date_text(&self, params: &PriceByDateParams) -> ToolResult<String> {
        let symbol = parse_symbol(&params.symbol)?;
        let date = parse_date("date", &params.date)?;
        let point = self.provider().price_on_or_after(&symbol, date).await?;
        Ok(format!("{:.4}", point.price))
    }

    async fn date_range_prices(&self, params: &DateRangeParams) -> ToolResult<BTreeMap<String, f64>> {
        let symbol = parse_symbol(&params.symbol)?;
        let start = parse_date("start_date", &params.start_date)?;
        let end = parse_date("end_date", &params.end_date)?;
        let request = HistoryRequest::between(symbol, start, end, Default::default())?;
        Ok(self.fetch(&request).await?.to_date_map())
    }

    async fn historical_prices(&self, params: &HistoricalParams) -> ToolResult<BTreeMap<String, f64>> {
        let symbol = parse_symbol(&params.symbol)?;
        let request = HistoryRequest::period(symbol, params.period, params.interval);
        Ok(self.fetch(&request).await?.to_date_map())
    }

    async fn dividend_table(&self, symbol: &str) -> ToolResult<BTreeMap<String, f64>> {
        let events = self.provider().dividends(&parse_symbol(symbol)?).await?;
        Ok(events
            .into_iter()
            .map(|e| (e.date.to_string(), e.amount))
            .collect())
    }

    async fn statement_table(
        &self,
        symbol: &str,
        kind: StatementKind,
        frequency: StatementFrequency,
    ) -> ToolResult<StatementTable> {
        let symbol = parse_symbol(symbol)?;
        let statement = self
            .provider()
            .financial_statement(&symbol, kind, frequency)
            .await?;
        Ok(statement.by_period())
    }

    async fn earnings(&self, params: &EarningsParams) -> ToolResult<Vec<EarningsDate>> {
        let symbol = parse_symbol(&params.symbol)?;
        Ok(self.provider().earnings_dates(&symbol, params.limit).await?)
    }

    async fn headlines(&self, symbol: &str) -> ToolResult<Vec<NewsItem>> {
        Ok(self.provider().news(&parse_symbol(symbol)?).await?)
    }
}
