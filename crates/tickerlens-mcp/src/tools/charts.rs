//! SVG chart tools.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use rmcp::{tool, tool_router, ErrorData as McpError};

use tickerlens_charts::{market_dashboard, portfolio_report, technical_analysis};
use tickerlens_core::{Period, PriceSeries, Symbol};

use crate::error::ToolResult;
use crate::params::{
    parse_symbol, parse_symbols, DashboardParams, PortfolioReportParams, TechnicalParams,
    WindowParams,
};
use crate::server::{text_response, TickerLensMcpServer};

fn daily(period: Period) -> WindowParams {
    WindowParams {
        period: Some(period),
        ..Default::default()
    }
}

#[tool_router(router = chart_router, vis = "pub(crate)")]
impl TickerLensMcpServer {
    /// Index dashboard
    #[tool(
        description = "Generate an SVG market dashboard for comma-separated indices: performance rebased to 100, period change and RSI sentiment."
    )]
    pub async fn generate_market_dashboard(
        &self,
        Parameters(params): Parameters<DashboardParams>,
    ) -> Result<CallToolResult, McpError> {
        text_response(self.dashboard_svg(&params).await)
    }

    /// Portfolio report
    #[tool(
        description = "Generate an SVG report for an equal-weight portfolio of comma-separated symbols: growth of 1 per holding and for the portfolio, plus total returns."
    )]
    pub async fn generate_portfolio_report(
        &self,
        Parameters(params): Parameters<PortfolioReportParams>,
    ) -> Result<CallToolResult, McpError> {
        text_response(self.portfolio_svg(&params).await)
    }

    /// Technical analysis
    #[tool(
        description = "Generate an SVG technical analysis for one symbol: price with 20/50-day moving averages and support/resistance, RSI(14) and MACD(12,26,9)."
    )]
    pub async fn generate_stock_technical_analysis(
        &self,
        Parameters(params): Parameters<TechnicalParams>,
    ) -> Result<CallToolResult, McpError> {
        text_response(self.technical_svg(&params).await)
    }
}

impl TickerLensMcpServer {
    /// Histories in the order the symbols were given.
    async fn ordered_histories(&self, symbols: Vec<Symbol>, period: Period) -> ToolResult<Vec<PriceSeries>> {
        let window = daily(period);
        let mut out = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            out.push(self.history(symbol, &window).await?);
        }
        Ok(out)
    }

    async fn dashboard_svg(&self, params: &DashboardParams) -> ToolResult<String> {
        let indices = self
            .ordered_histories(parse_symbols(&params.indices)?, params.period)
            .await?;
        Ok(market_dashboard(&indices)?)
    }

    async fn portfolio_svg(&self, params: &PortfolioReportParams) -> ToolResult<String> {
        let holdings = self
            .ordered_histories(parse_symbols(&params.symbols)?, params.period)
            .await?;
        Ok(portfolio_report(&holdings)?)
    }

    async fn technical_svg(&self, params: &TechnicalParams) -> ToolResult<String> {
        let series = self
            .history(parse_symbol(&params.symbol)?, &daily(params.period))
            .await?;
        Ok(technical_analysis(&series)?)
    }
}
