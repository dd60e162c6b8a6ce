//! RSS/Atom feeds.

use async_trait::async_trait;
use feed_rs::model::Entry;

use newsroom_core::Error;

use super::{Adapter, CandidateItem, backfill_summary};
use crate::extract::{DetailExtractor, fragment_text};
use crate::fetch::FetchClient;
use crate::normalize::BatchDedup;

/// Timestamp format for feed `published_at` values.
pub const FEED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub struct FeedAdapter {
    client: FetchClient,
    extractor: DetailExtractor,
    max_items: usize,
}

impl FeedAdapter {
    pub fn new(client: FetchClient, max_items: usize) -> Self {
        Self { client, extractor: DetailExtractor::default(), max_items }
    }

    pub async fn backfill_summary(&self, item: &mut CandidateItem) {
        backfill_summary(&self.client, &self.extractor, item).await;
    }
}

#[async_trait]
impl Adapter for FeedAdapter {
    fn name(&self) -> &str {
        "feed"
    }

    async fn discover(&self, feed_url: &str) -> Result<Vec<CandidateItem>, Error> {
        let response = self.client.fetch(feed_url).await?;
        let items = parse_feed(&response.body, self.max_items)?;
        tracing::debug!(feed = feed_url, items = items.len(), "parsed feed");
        Ok(items)
    }
}

/// Parse RSS/Atom bytes into candidates, first `max_items` unique URLs.
///
/// Entries without a link or a title are dropped here.
pub fn parse_feed(bytes: &[u8], max_items: usize) -> Result<Vec<CandidateItem>, Error> {
    let feed = feed_rs::parser::parse(bytes).map_err(|e| Error::FeedParse(e.to_string()))?;

    let mut dedup = BatchDedup::new();
    let items = feed
        .entries
        .into_iter()
        .map(entry_to_candidate)
        .filter(|item| item.is_complete())
        .filter(|item| dedup.admit_url(&item.url))
        .take(max_items)
        .collect();

    Ok(items)
}

fn entry_to_candidate(entry: Entry) -> CandidateItem {
    let url = entry.links.first().map(|l| l.href.trim().to_string()).unwrap_or_default();
    let title = entry.title.map(|t| t.content.trim().to_string()).unwrap_or_default();
    let summary = entry
        .summary
        .map(|s| fragment_text(&s.content))
        .filter(|s| !s.is_empty());
    let published_at = entry
        .published
        .or(entry.updated)
        .map(|dt| dt.naive_utc().format(FEED_TIMESTAMP_FORMAT).to_string());
    let image_url = entry
        .media
        .iter()
        .flat_map(|m| m.thumbnails.iter())
        .map(|t| t.image.uri.trim())
        .find(|uri| !uri.is_empty())
        .map(str::to_string);

    CandidateItem { url, title, summary, image_url, published_at, press: None }
}
