//! crawl_source tool implementation.
//!
//! Crawls one configured source by id.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use newsroom_core::Error;

use super::{NewsCrawler, json_result};

/// Parameters for the crawl_source tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CrawlSourceParams {
    /// Id of a source from configuration (e.g. "yozm_it", "i_boss").
    pub source_id: String,
}

pub async fn crawl_source_impl(crawler: &NewsCrawler, params: CrawlSourceParams) -> Result<CallToolResult, McpError> {
    let source_id = params.source_id.trim();
    if source_id.is_empty() {
        return Err(Error::InvalidInput("source_id cannot be empty".into()).into());
    }

    let report = crawler.crawl_source_by_id(source_id).await?;
    json_result(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::crawler;
    use newsroom_core::AppConfig;

    #[tokio::test]
    async fn test_empty_source_id() {
        let crawler = crawler(AppConfig::default()).await;
        let err = crawl_source_impl(&crawler, CrawlSourceParams { source_id: "  ".into() }).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_unknown_source() {
        let crawler = crawler(AppConfig::default()).await;
        let err = crawl_source_impl(&crawler, CrawlSourceParams { source_id: "missing".into() }).await.unwrap_err();
        assert_eq!(err.code.0, -32014);
        assert!(err.message.contains("SOURCE_NOT_FOUND"));
    }
}
