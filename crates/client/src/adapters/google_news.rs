//! Google News RSS search.

use async_trait::async_trait;
use url::Url;

use newsroom_core::Error;
use newsroom_core::config::SearchConfig;

use super::{Adapter, CandidateItem, parse_feed};
use crate::fetch::FetchClient;
use crate::normalize::{BatchDedup, format_title_with_press, press_suffix, unwrap_redirect};

pub struct GoogleNewsAdapter {
    client: FetchClient,
    search: SearchConfig,
    max_items: usize,
}

impl GoogleNewsAdapter {
    pub fn new(client: FetchClient, search: SearchConfig, max_items: usize) -> Self {
        Self { client, search, max_items }
    }
}

#[async_trait]
impl Adapter for GoogleNewsAdapter {
    fn name(&self) -> &str {
        "google"
    }

    async fn discover(&self, keyword: &str) -> Result<Vec<CandidateItem>, Error> {
        let url = google_news_url(&self.search, keyword)?;
        let response = self.client.fetch(url.as_str()).await?;
        parse_google_news(&response.body, self.max_items)
    }
}

/// Search feed URL for `keyword`.
pub fn google_news_url(search: &SearchConfig, keyword: &str) -> Result<Url, Error> {
    Url::parse_with_params(
        &search.google_news_url,
        &[
            ("q", keyword.trim()),
            ("hl", search.google_hl.as_str()),
            ("gl", search.google_gl.as_str()),
            ("ceid", search.google_ceid.as_str()),
        ],
    )
    .map_err(|e| Error::Configuration(format!("search.google_news_url {}: {e}", search.google_news_url)))
}

/// Parse a search feed. Titles become `"[Press] Title"` and redirect
/// wrappers are replaced by their target before URL dedup.
pub fn parse_google_news(bytes: &[u8], max_items: usize) -> Result<Vec<CandidateItem>, Error> {
    let mut dedup = BatchDedup::new();
    let items = parse_feed(bytes, usize::MAX)?
        .into_iter()
        .map(|mut item| {
            item.url = unwrap_redirect(&item.url);
            item.press = press_suffix(&item.title).map(str::to_string);
            item.title = format_title_with_press(&item.title, item.press.as_deref());
            item
        })
        .filter(|item| dedup.admit_url(&item.url))
        .take(max_items)
        .collect();
    Ok(items)
}
