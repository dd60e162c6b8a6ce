//! crawl_keywords tool implementation.
//!
//! Searches news providers for keywords. Omitted parameters fall back to
//! configuration: the configured keyword list, `day_window`,
//! `max_items_per_keyword` and `search_providers`.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use newsroom_client::KeywordCrawlOptions;
use newsroom_core::{Error, KeywordDef};

use super::{NewsCrawler, json_result};

/// Parameters for the crawl_keywords tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CrawlKeywordsParams {
    /// Keywords to search. A blank `keyword_norm` defaults to the lowercased keyword.
    #[serde(default)]
    pub keywords: Option<Vec<KeywordDef>>,

    /// Recency window in days, today included.
    #[serde(default)]
    pub days: Option<u32>,

    /// Items collected per keyword before moving on.
    #[serde(default)]
    pub max_items_per_keyword: Option<usize>,

    /// Providers to query: "google", "naver".
    #[serde(default)]
    pub providers: Option<Vec<String>>,
}

pub async fn crawl_keywords_impl(
    crawler: &NewsCrawler, params: CrawlKeywordsParams,
) -> Result<CallToolResult, McpError> {
    let mut options = KeywordCrawlOptions::from_config(crawler.config());
    if let Some(days) = params.days {
        options.days = days;
    }
    if let Some(max) = params.max_items_per_keyword {
        options.max_items_per_keyword = max;
    }
    if let Some(providers) = params.providers {
        options.providers = providers;
    }
    if options.days == 0 || options.max_items_per_keyword == 0 {
        return Err(Error::InvalidInput("days and max_items_per_keyword must be at least 1".into()).into());
    }

    let report = match params.keywords {
        Some(keywords) => {
            let keywords: Vec<KeywordDef> = keywords.into_iter().map(with_default_norm).collect();
            crawler.crawl_keywords(&keywords, &options).await?
        }
        None => crawler.crawl_configured_keywords(&options).await?,
    };
    json_result(&report)
}

fn with_default_norm(mut def: KeywordDef) -> KeywordDef {
    if def.keyword_norm.trim().is_empty() {
        def.keyword_norm = def.keyword.trim().to_lowercase();
    }
    def
}
