//! crawl_all tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};

use super::{NewsCrawler, json_result};

/// Crawls every configured source; per-source failures are part of the report.
pub async fn crawl_all_impl(crawler: &NewsCrawler) -> Result<CallToolResult, McpError> {
    let report = crawler.crawl_all().await;
    json_result(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{crawler, text};
    use newsroom_core::config::StartUrls;
    use newsroom_core::{AppConfig, SourceDef};

    #[tokio::test]
    async fn test_no_sources() {
        let crawler = crawler(AppConfig::default()).await;
        let result = crawl_all_impl(&crawler).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&text(&result)).unwrap();
        assert_eq!(json, serde_json::json!({"inserted": 0, "sources": []}));
    }

    #[tokio::test]
    async fn test_bad_source_is_reported_not_raised() {
        let config = AppConfig {
            sources: vec![SourceDef::new("mystery", StartUrls::One("https://mystery.example/list".into()))],
            ..Default::default()
        };
        let crawler = crawler(config).await;
        let result = crawl_all_impl(&crawler).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&text(&result)).unwrap();
        assert_eq!(json["sources"][0]["source_id"], "mystery");
        assert!(json["sources"][0]["error"].as_str().unwrap().starts_with("CONFIG_ERROR"));
    }
}
