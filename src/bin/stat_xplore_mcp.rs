//! Stat-Xplore MCP Server Binary
//!
//! Serves the Stat-Xplore tools over stdio. Logs are written to stderr so
//! stdout carries protocol frames only.
//!
//! ## Usage
//!
//! ```bash
//! STAT_XPLORE_API_KEY=... ./target/debug/stat_xplore_mcp
//! RUST_LOG=debug ./target/debug/stat_xplore_mcp
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stat_xplore::mcp::McpServer;
use stat_xplore::{Settings, StatXploreClient};

#[derive(Parser)]
#[command(name = "stat_xplore_mcp")]
#[command(version)]
#[command(about = "Stat-Xplore Model Context Protocol (MCP) server")]
struct Cli {
    /// Provider REST root (overrides STAT_XPLORE_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Maximum schema folder depth (overrides STAT_XPLORE_MAX_DEPTH)
    #[arg(long)]
    max_depth: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stat_xplore=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env().context("failed to load configuration")?;
    if let Some(base_url) = cli.base_url.as_deref() {
        settings = settings.with_base_url(base_url)?;
    }
    if let Some(max_depth) = cli.max_depth {
        settings.max_depth = max_depth;
    }
    if settings.api_key.is_empty() {
        warn!("STAT_XPLORE_API_KEY is not set; provider calls will be rejected");
    }

    let client = StatXploreClient::from_settings(&settings)?;
    info!(upstream = %settings.base_url, "starting Stat-Xplore MCP server");

    McpServer::new(client).run().await
}
