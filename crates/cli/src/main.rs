//! newsroom command-line trigger.
//!
//! Runs one crawl and prints its report as JSON on stdout, for schedulers
//! and cron. Logs go to stderr; `RUST_LOG` controls verbosity.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use newsroom_client::{Crawler, KeywordCrawlOptions};
use newsroom_core::{AppConfig, NewsDb};

#[derive(Debug, Parser)]
#[command(name = "newsroom", version, about = "Crawl news sources into the article store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Crawl one configured source
    Crawl {
        source_id: String,
    },
    /// Crawl every configured source
    CrawlAll,
    /// Ingest an RSS/Atom feed without a source id
    Feed {
        url: String,
    },
    /// Search the configured keywords
    Keywords {
        /// Recency window in days (default: day_window)
        #[arg(long)]
        days: Option<u32>,
        /// Items per keyword (default: max_items_per_keyword)
        #[arg(long)]
        max: Option<usize>,
        /// Search provider, repeatable (default: search_providers)
        #[arg(long = "provider")]
        providers: Vec<String>,
    },
    /// Show the most recently stored articles
    Recent {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

impl Command {
    fn keyword_options(
        config: &AppConfig, days: Option<u32>, max: Option<usize>, providers: Vec<String>,
    ) -> KeywordCrawlOptions {
        let mut options = KeywordCrawlOptions::from_config(config);
        if let Some(days) = days {
            options.days = days;
        }
        if let Some(max) = max {
            options.max_items_per_keyword = max;
        }
        if !providers.is_empty() {
            options.providers = providers;
        }
        options
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Run one command and return its report.
async fn run(crawler: &Crawler<NewsDb>, command: Command) -> Result<Value> {
    match command {
        Command::Crawl { source_id } => to_json(&crawler.crawl_source_by_id(&source_id).await?),
        Command::CrawlAll => to_json(&crawler.crawl_all().await),
        Command::Feed { url } => to_json(&crawler.crawl_feed(&url).await?),
        Command::Keywords { days, max, providers } => {
            let options = Command::keyword_options(crawler.config(), days, max, providers);
            to_json(&crawler.crawl_configured_keywords(&options).await?)
        }
        Command::Recent { limit } => to_json(&crawler.store().list_recent_articles(limit).await?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "newsroom starting");
    let config = AppConfig::load()?;
    let db = NewsDb::open(&config.db_path).await?;
    let crawler = Crawler::new(config, db)?;

    let report = run(&crawler, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
