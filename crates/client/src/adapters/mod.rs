//! Source adapters: turn one start point into candidate items.
//!
//! Every adapter dedups by URL within a single `discover` call and caps the
//! number of items it returns. None of them touch the store.

pub mod feed;
pub mod google_news;
pub mod listing;
pub mod naver;

use async_trait::async_trait;
use serde::Serialize;

use newsroom_core::Error;

use crate::extract::DetailExtractor;
use crate::fetch::FetchClient;

pub use feed::{FeedAdapter, parse_feed};
pub use google_news::{GoogleNewsAdapter, google_news_url, parse_google_news};
pub use listing::{FetchMode, ListingAdapter, ListingTemplate, iboss_article_pattern, parse_listing};
pub use naver::{NaverNewsAdapter, naver_search_url, parse_naver_results};

/// An item discovered by an adapter, before enrichment and dedup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateItem {
    pub url: String,
    pub title: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    /// `YYYY-MM-DD` or an ISO timestamp.
    pub published_at: Option<String>,
    /// Publisher name, only set by search adapters.
    pub press: Option<String>,
}

impl CandidateItem {
    /// Whether a detail fetch could fill something in.
    pub fn needs_enrichment(&self) -> bool {
        self.title.trim().is_empty()
            || self.published_at.is_none()
            || self.summary.as_deref().is_none_or(|s| s.trim().is_empty())
            || self.image_url.is_none()
    }

    /// Has the two fields every stored record needs.
    pub fn is_complete(&self) -> bool {
        !self.url.trim().is_empty() && !self.title.trim().is_empty()
    }
}

/// Fill a missing summary from the item's page `description` meta tags.
///
/// Best effort: a failed fetch or a page without a description leaves the
/// item as it was.
pub async fn backfill_summary(client: &FetchClient, extractor: &DetailExtractor, item: &mut CandidateItem) {
    if item.summary.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        return;
    }
    if let Some(page) = client.fetch_best_effort(&item.url).await {
        item.summary = extractor.extract_summary(&page);
    }
}

/// Discovers candidate items from one start point (a URL or a keyword).
#[async_trait]
pub trait Adapter: Send + Sync {
    fn name(&self) -> &str;

    async fn discover(&self, start: &str) -> Result<Vec<CandidateItem>, Error>;
}

/// Keyword search providers, in the order they are queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    Google,
    Naver,
}

impl SearchProvider {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "google" => Some(SearchProvider::Google),
            "naver" => Some(SearchProvider::Naver),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchProvider::Google => "google",
            SearchProvider::Naver => "naver",
        }
    }

    /// Parse, dedup and order provider names. Blank names are ignored and an
    /// empty result defaults to Google.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for an unknown provider name.
    pub fn resolve_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Self>, Error> {
        let mut providers = Vec::new();
        for name in names.iter().map(AsRef::as_ref).filter(|n| !n.trim().is_empty()) {
            let provider = Self::parse(name)
                .ok_or_else(|| Error::Configuration(format!("unknown search provider: {name}")))?;
            providers.push(provider);
        }
        providers.sort();
        providers.dedup();
        if providers.is_empty() {
            providers.push(SearchProvider::Google);
        }
        Ok(providers)
    }
}

impl std::fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
