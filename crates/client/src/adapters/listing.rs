//! HTML listing pages for sites without a feed.
//!
//! Two templates are supported:
//! - `yozm_it`: article hrefs contain `/magazine/detail/`; pages are fetched
//!   once and a failing list page is skipped
//! - `i_boss`: article hrefs look like `/ab-{category}-{id}`, with the
//!   category read from the start URL; pages are fetched with retries (and
//!   through the proxy when configured) and list-page exhaustion is an error

use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html};
use url::Url;

use newsroom_core::Error;

use super::{Adapter, CandidateItem};
use crate::dates::format_date;
use crate::extract::{anchor_title, article_links, card_fields};
use crate::fetch::{FetchClient, FetchContext};

const YOZM_DETAIL_PATH: &str = "/magazine/detail/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingTemplate {
    YozmIt,
    IBoss,
}

/// How a template fetches its pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// One attempt; list failures skip the page, detail failures leave fields empty.
    Simple,
    /// Bounded retries; list exhaustion propagates, detail exhaustion leaves fields empty.
    Retrying,
}

impl ListingTemplate {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "yozm_it" => Some(ListingTemplate::YozmIt),
            "i_boss" => Some(ListingTemplate::IBoss),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ListingTemplate::YozmIt => "yozm_it",
            ListingTemplate::IBoss => "i_boss",
        }
    }

    pub fn fetch_mode(&self) -> FetchMode {
        match self {
            ListingTemplate::YozmIt => FetchMode::Simple,
            ListingTemplate::IBoss => FetchMode::Retrying,
        }
    }

    /// Pattern an anchor's raw href must match to count as an article.
    pub fn article_pattern(&self, start_url: &str) -> Result<Regex, Error> {
        match self {
            ListingTemplate::YozmIt => Regex::new(&regex::escape(YOZM_DETAIL_PATH))
                .map_err(|e| Error::Configuration(format!("article pattern: {e}"))),
            ListingTemplate::IBoss => iboss_article_pattern(start_url),
        }
    }
}

/// `/ab-{category}-\d+` when the start URL carries `/ab-{category}`, else any category.
pub fn iboss_article_pattern(start_url: &str) -> Result<Regex, Error> {
    let category = Regex::new(r"/ab-(\d+)")
        .ok()
        .and_then(|re| re.captures(start_url))
        .map(|caps| caps[1].to_string());

    let pattern = match category {
        Some(category) => format!(r"/ab-{category}-\d+"),
        None => r"/ab-\d+-\d+".to_string(),
    };
    Regex::new(&pattern).map_err(|e| Error::Configuration(format!("article pattern: {e}")))
}

/// Candidates from one listing page, in document order.
pub fn parse_listing(html: &str, page_url: &Url, pattern: &Regex, max_items: usize) -> Vec<CandidateItem> {
    let document = Html::parse_document(html);
    article_links(&document, page_url, pattern)
        .into_iter()
        .take(max_items)
        .map(|link| {
            let card = link
                .anchor
                .parent()
                .and_then(ElementRef::wrap)
                .map(|card| card_fields(card, page_url))
                .unwrap_or_default();
            CandidateItem {
                url: link.url,
                title: anchor_title(link.anchor),
                summary: card.summary,
                image_url: card.image_url,
                published_at: card.published_at.map(format_date),
                press: None,
            }
        })
        .collect()
}

pub struct ListingAdapter {
    client: FetchClient,
    template: ListingTemplate,
    source_id: String,
    max_items: usize,
}

impl ListingAdapter {
    pub fn new(client: FetchClient, template: ListingTemplate, source_id: impl Into<String>, max_items: usize) -> Self {
        Self { client, template, source_id: source_id.into(), max_items }
    }

    pub fn template(&self) -> ListingTemplate {
        self.template
    }

    /// Detail page markup, or `None` when it could not be fetched.
    pub async fn fetch_detail(&self, url: &str) -> Option<String> {
        match self.template.fetch_mode() {
            FetchMode::Simple => self.client.fetch_best_effort(url).await,
            FetchMode::Retrying => {
                let ctx = FetchContext::new(&self.source_id, "detail");
                self.client.fetch_with_retry(url, &ctx).await.ok()
            }
        }
    }
}

#[async_trait]
impl Adapter for ListingAdapter {
    fn name(&self) -> &str {
        self.template.name()
    }

    async fn discover(&self, start_url: &str) -> Result<Vec<CandidateItem>, Error> {
        let page_url =
            Url::parse(start_url).map_err(|e| Error::Configuration(format!("invalid start_url {start_url}: {e}")))?;
        let pattern = self.template.article_pattern(start_url)?;

        let html = match self.template.fetch_mode() {
            FetchMode::Simple => match self.client.fetch_text(start_url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!(
                        source = %self.source_id,
                        stage = "list",
                        url = start_url,
                        error = %e,
                        "skipping list page"
                    );
                    return Ok(Vec::new());
                }
            },
            FetchMode::Retrying => {
                let ctx = FetchContext::new(&self.source_id, "list");
                self.client.fetch_with_retry(start_url, &ctx).await?
            }
        };

        let items = parse_listing(&html, &page_url, &pattern, self.max_items);
        tracing::debug!(source = %self.source_id, url = start_url, items = items.len(), "parsed listing page");
        Ok(items)
    }
}
