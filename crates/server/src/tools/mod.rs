//! MCP tool implementations.
//!
//! Each tool validates its parameters, runs one crawl through the shared
//! [`NewsCrawler`], and returns the crawl report as pretty-printed JSON.

pub mod crawl_all;
pub mod crawl_feed;
pub mod crawl_keywords;
pub mod crawl_source;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use newsroom_client::Crawler;
use newsroom_core::{Error, NewsDb};

pub use crawl_feed::CrawlFeedParams;
pub use crawl_keywords::CrawlKeywordsParams;
pub use crawl_source::CrawlSourceParams;

/// The crawler every tool runs against.
pub type NewsCrawler = Crawler<NewsDb>;

fn json_result<T: Serialize>(report: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize report: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
pub(crate) mod test_support {
    use newsroom_core::AppConfig;

    use super::NewsCrawler;
    use newsroom_core::NewsDb;

    pub async fn crawler(config: AppConfig) -> NewsCrawler {
        let db = NewsDb::open_in_memory().await.unwrap();
        NewsCrawler::new(config, db).unwrap()
    }

    /// Text of the first content block.
    pub fn text(result: &rmcp::model::CallToolResult) -> String {
        result.content[0].as_text().map(|t| t.text.clone()).unwrap_or_default()
    }
}
