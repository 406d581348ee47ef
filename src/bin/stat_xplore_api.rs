//! Stat-Xplore REST API Binary
//!
//! ## Usage
//!
//! ```bash
//! STAT_XPLORE_API_KEY=... ./target/debug/stat_xplore_api --bind 127.0.0.1:8000
//! ```
//!
//! ## Environment Variables
//!
//! - `STAT_XPLORE_API_KEY`: provider API key
//! - `STAT_XPLORE_BASE_URL` (optional): provider REST root
//! - `STAT_XPLORE_TIMEOUT_SECS` (optional): per-request timeout, default 120
//! - `STAT_XPLORE_MAX_DEPTH` (optional): schema traversal depth, default 32
//! - `STAT_XPLORE_BIND_ADDR` (optional): listen address, default 0.0.0.0:8000
//! - `RUST_LOG` (optional): log filter

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stat_xplore::api::build_router;
use stat_xplore::{Settings, StatXploreClient};

#[derive(Parser)]
#[command(name = "stat_xplore_api")]
#[command(version)]
#[command(about = "REST facade over the Stat-Xplore statistics API")]
struct Cli {
    /// Address to listen on (overrides STAT_XPLORE_BIND_ADDR)
    #[arg(short, long)]
    bind: Option<String>,

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
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,stat_xplore=debug,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env().context("failed to load configuration")?;
    if let Some(bind) = cli.bind {
        settings.bind_addr = bind;
    }
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
    let app = build_router(client);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    info!(addr = %settings.bind_addr, upstream = %settings.base_url, "Stat-Xplore API listening");

    axum::serve(listener, app).await?;
    Ok(())
}
