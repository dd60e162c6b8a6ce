//! crawl_feed tool implementation.
//!
//! Ingests an RSS/Atom feed without a source id.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use newsroom_core::Error;

use super::{NewsCrawler, json_result};

/// Parameters for the crawl_feed tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CrawlFeedParams {
    /// Feed URL. A missing scheme defaults to https.
    pub feed_url: String,
}

pub async fn crawl_feed_impl(crawler: &NewsCrawler, params: CrawlFeedParams) -> Result<CallToolResult, McpError> {
    if params.feed_url.trim().is_empty() {
        return Err(Error::InvalidInput("feed_url cannot be empty".into()).into());
    }

    let report = crawler.crawl_feed(&params.feed_url).await?;
    json_result(&report)
}
