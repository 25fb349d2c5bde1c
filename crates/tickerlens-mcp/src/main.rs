//! TickerLens MCP Server - Market Analytics via Model Context Protocol
//!
//! # Usage
//!
//! ## stdio transport (for desktop MCP clients)
//! ```bash
//! tickerlens-mcp-server
//! tickerlens-mcp-server --demo                 # synthetic market
//! tickerlens-mcp-server --data-dir ./prices    # CSV files
//! ```
//!
//! ## HTTP transport (for remote hosting)
//! ```bash
//! tickerlens-mcp-server --http --port 8080
//! tickerlens-mcp-server --config tickerlens.toml --http
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tickerlens_mcp::config::{ProviderKind, ServerConfig};
use tickerlens_mcp::server::TickerLensMcpServer;

/// TickerLens MCP Server - Market Analytics
#[derive(Parser, Debug)]
#[command(name = "tickerlens-mcp-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable demo mode with a synthetic December 2025 market
    #[arg(short, long)]
    demo: bool,

    /// Serve prices from a directory of <SYMBOL>.csv files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Use HTTP transport instead of stdio (for remote hosting)
    #[arg(long)]
    http: bool,

    /// HTTP port (only used with --http)
    #[arg(short, long)]
    port: Option<u16>,

    /// HTTP host to bind to (only used with --http)
    #[arg(long)]
    host: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Configuration file values with command-line overrides applied.
    fn resolve_config(&self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(port) = self.port {
            config.transport.port = port;
        }
        if let Some(host) = &self.host {
            config.transport.host = host.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.provider.kind = ProviderKind::Csv;
            config.provider.data_dir = Some(dir.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("tickerlens_mcp=debug,tickerlens_yahoo=debug,rmcp=debug"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("tickerlens_mcp=info,rmcp=warn"))
    };

    // Only log to stderr for stdio transport to avoid corrupting the protocol
    if args.http {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let config = args.resolve_config()?;

    // Create server
    let server = if args.demo {
        tracing::info!("Starting TickerLens MCP Server in DEMO mode");
        tracing::info!("Demo data: synthetic market ending 2025-12-31");
        TickerLensMcpServer::with_demo_mode()?
    } else {
        tracing::info!(provider = ?config.provider.kind, "Starting TickerLens MCP Server");
        TickerLensMcpServer::from_config(&config)?
    };

    if args.http {
        run_http_server(server, &config.transport.host, config.transport.port).await
    } else {
        run_stdio_server(server).await
    }
}

/// Run the server with stdio transport
async fn run_stdio_server(server: TickerLensMcpServer) -> anyhow::Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    tracing::info!("Using stdio transport");

    let tools = server.tool_names();
    let service = server.serve(stdio()).await?;

    tracing::info!("TickerLens MCP Server ready");
    tracing::info!(count = tools.len(), "Available tools: {}", tools.join(", "));

    service.waiting().await?;

    Ok(())
}

/// Run the server with HTTP transport (for remote hosting)
#[cfg(feature = "http")]
async fn run_http_server(server: TickerLensMcpServer, host: &str, port: u16) -> anyhow::Result<()> {
    use axum::Router;
    use rmcp::transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpService,
    };
    use tower_http::cors::{Any, CorsLayer};

    tracing::info!("Using HTTP transport on {}:{}", host, port);

    // Sessions share the provider, and with it the Yahoo cookie/crumb cache.
    let mcp_service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    // Configure CORS for browser clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .nest_service("/mcp", mcp_service)
        .route("/health", axum::routing::get(health_check))
        .layer(cors);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("TickerLens MCP Server listening on http://{}/mcp", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for CTRL+C");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutting down...");
        })
        .await?;

    Ok(())
}

/// Health check endpoint for HTTP transport
#[cfg(feature = "http")]
async fn health_check() -> &'static str {
    "OK"
}

/// Fallback when HTTP feature is not enabled
#[cfg(not(feature = "http"))]
async fn run_http_server(_server: TickerLensMcpServer, _host: &str, _port: u16) -> anyhow::Result<()> {
    anyhow::bail!("HTTP transport not available. Rebuild with: cargo build --features http")
}
