//! MCP Server implementation for TickerLens.
//!
//! The tools themselves live in `tools/`, one router per family (market
//! data, charts, metrics); they are merged into a single [`ToolRouter`] here.

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{tool_handler, ErrorData as McpError, ServerHandler};
use serde::Serialize;

use tickerlens_core::{PriceSeries, Symbol};
use tickerlens_traits::{HistoryRequest, MarketDataProvider, ProviderResult};

use crate::config::{ConfigResult, ServerConfig};
use crate::demo::DemoProvider;
use crate::error::{ToolError, ToolResult};
use crate::params::WindowParams;
use crate::{SERVER_NAME, SERVER_VERSION};

/// MCP Server for TickerLens market analytics
#[derive(Clone)]
pub struct TickerLensMcpServer {
    /// Market data source shared by every tool call
    provider: Arc<dyn MarketDataProvider>,
    /// Demo mode enabled
    demo_mode: bool,
    /// Tool router for MCP tools
    tool_router: ToolRouter<Self>,
}

impl TickerLensMcpServer {
    /// Create a server over `provider`
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            demo_mode: false,
            tool_router: Self::router(),
        }
    }

    /// Create a server backed by the synthetic December 2025 market
    pub fn with_demo_mode() -> ProviderResult<Self> {
        let mut server = Self::new(Arc::new(DemoProvider::new()?));
        server.demo_mode = true;
        Ok(server)
    }

    /// Create a server with the provider named in `config`
    pub fn from_config(config: &ServerConfig) -> ConfigResult<Self> {
        Ok(Self::new(config.build_provider()?))
    }

    fn router() -> ToolRouter<Self> {
        Self::data_router() + Self::chart_router() + Self::metric_router()
    }

    /// Check if demo mode is enabled
    pub fn is_demo_mode(&self) -> bool {
        self.demo_mode
    }

    /// The market data provider
    pub fn provider(&self) -> &Arc<dyn MarketDataProvider> {
        &self.provider
    }

    /// Names of every registered tool
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        names
    }

    pub(crate) async fn fetch(&self, request: &HistoryRequest) -> ToolResult<PriceSeries> {
        tracing::debug!(
            provider = self.provider.name(),
            symbol = %request.symbol,
            range = ?request.range,
            interval = %request.interval,
            "fetching price history"
        );
        Ok(self.provider.price_history(request).await?)
    }

    /// History of one symbol over a metric window.
    pub(crate) async fn history(&self, symbol: Symbol, window: &WindowParams) -> ToolResult<PriceSeries> {
        self.fetch(&window.request(symbol)?).await
    }

    /// Histories keyed by symbol. Duplicates are fetched once.
    pub(crate) async fn histories(
        &self,
        symbols: &[Symbol],
        window: &WindowParams,
    ) -> ToolResult<BTreeMap<Symbol, PriceSeries>> {
        let mut out = BTreeMap::new();
        for symbol in symbols {
            if !out.contains_key(symbol) {
                let series = self.history(symbol.clone(), window).await?;
                out.insert(symbol.clone(), series);
            }
        }
        Ok(out)
    }
}

/// Logs a failed tool call and converts it to the MCP error.
fn failure(err: ToolError) -> McpError {
    if err.is_caller_error() {
        tracing::info!(kind = err.kind(), error = %err, "tool call rejected");
    } else {
        tracing::warn!(kind = err.kind(), error = %err, "tool call failed");
    }
    err.into()
}

/// Create a success result with text content
pub(crate) fn text_response(result: ToolResult<String>) -> Result<CallToolResult, McpError> {
    let text = result.map_err(failure)?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Create a success result with JSON content
pub(crate) fn json_response<T: Serialize>(result: ToolResult<T>) -> Result<CallToolResult, McpError> {
    let value = result.map_err(failure)?;
    let json = serde_json::to_string_pretty(&value)
        .map_err(|e| failure(ToolError::Serialization(e)))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_handler]
impl ServerHandler for TickerLensMcpServer {
    fn get_info(&self) -> ServerInfo {
        let instructions = if self.demo_mode {
            "TickerLens MCP Server (DEMO MODE) - Market analytics over a synthetic market \
             ending 2025-12-31. Symbols: ^GSPC, ^DJI, ^IXIC, AAPL, MSFT, GOOGL, AMZN, NVDA, TSLA."
        } else {
            "TickerLens MCP Server - Stock market data, technical indicators, risk metrics \
             and SVG charts. Dates are YYYY-MM-DD; metric tools take either \
             start_date/end_date or a period such as 1mo, 6mo or 1y."
        };

        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
                title: Some("TickerLens Market Analytics".to_string()),
                icons: None,
                website_url: None,
            },
            instructions: Some(instructions.to_string()),
        }
    }
}
