//! newsroom MCP server entry point.
//!
//! Loads configuration, opens the article store, and serves the crawl tools
//! on stdio. Logging goes to stderr to avoid interfering with the JSON-RPC
//! protocol on stdout.

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

use newsroom_client::Crawler;
use newsroom_core::{AppConfig, NewsDb};

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        db = %config.db_path.display(),
        sources = config.sources.len(),
        "Starting newsroom server on stdio transport"
    );

    let db = NewsDb::open(&config.db_path).await?;
    let crawler = Crawler::new(config, db)?;

    let handler = handler::NewsroomServer::new(crawler);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
