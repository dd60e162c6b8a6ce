//! Crawl results returned to callers.

use serde::Serialize;

/// Result of crawling one source or one feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceCrawlReport {
    /// `None` for ungrouped feed ingestion.
    pub source_id: Option<String>,
    pub inserted: usize,
    /// Candidates examined after batch dedup and the per-source cap.
    pub considered: usize,
}

impl SourceCrawlReport {
    pub fn new(source_id: Option<&str>) -> Self {
        Self { source_id: source_id.map(str::to_string), ..Default::default() }
    }
}

/// Per-source entry of a `crawl_all` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SourceOutcome {
    Crawled { source_id: String, inserted: usize },
    Failed { source_id: String, error: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlAllReport {
    pub inserted: usize,
    pub sources: Vec<SourceOutcome>,
}

/// Per-keyword entry of a keyword crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordOutcome {
    pub keyword: String,
    pub keyword_norm: String,
    pub inserted: usize,
    /// Items stored or already present, counted against the per-keyword limit.
    pub collected: usize,
    /// Provider failures, as `"provider: error"`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordCrawlReport {
    pub inserted: usize,
    pub keywords_processed: usize,
    pub per_keyword: Vec<KeywordOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serializes_flat() {
        let ok = SourceOutcome::Crawled { source_id: "yozm_it".into(), inserted: 3 };
        let failed = SourceOutcome::Failed { source_id: "i_boss".into(), error: "FETCH_FAILED".into() };
        assert_eq!(serde_json::to_value(&ok).unwrap(), serde_json::json!({"source_id": "yozm_it", "inserted": 3}));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({"source_id": "i_boss", "error": "FETCH_FAILED"})
        );
    }

    #[test]
    fn test_keyword_outcome_omits_empty_errors() {
        let outcome = KeywordOutcome { keyword: "Rust".into(), keyword_norm: "rust".into(), ..Default::default() };
        let value = serde_json::to_value(&outcome).unwrap();
        assert!(value.get("errors").is_none());
    }
}
