//! Ingestion orchestrator.
//!
//! One `Crawler` drives a crawl end to end: resolve and validate the
//! definition, discover candidates, enrich them from detail pages, filter,
//! and insert what the store doesn't already have. Sources and keywords are
//! handled one after another; nothing here runs concurrently.

pub mod report;

use chrono::NaiveDate;
use url::Url;

use newsroom_core::{AppConfig, ArticleStore, Error, KeywordDef, NewArticle, NewKeywordArticle, SourceDef};

pub use report::{CrawlAllReport, KeywordCrawlReport, KeywordOutcome, SourceCrawlReport, SourceOutcome};

use crate::adapters::{
    Adapter, CandidateItem, FeedAdapter, GoogleNewsAdapter, ListingAdapter, ListingTemplate, NaverNewsAdapter,
    SearchProvider, backfill_summary,
};
use crate::dates::{is_within_window, parse_stored_date};
use crate::extract::{DetailExtractor, DetailMetadata};
use crate::fetch::{FetchClient, FetchConfig};
use crate::normalize::{BatchDedup, canonicalize, resolve};

/// Name of the template that ingests a source's start URLs as feeds.
pub const FEED_TEMPLATE: &str = "feed";

/// Tunables for one keyword crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCrawlOptions {
    /// Inclusive recency window in days.
    pub days: u32,
    pub max_items_per_keyword: usize,
    /// Provider names; empty means Google only.
    pub providers: Vec<String>,
}

impl KeywordCrawlOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            days: config.day_window,
            max_items_per_keyword: config.max_items_per_keyword,
            providers: config.search_providers.clone(),
        }
    }
}

enum SourceKind {
    Listing(ListingTemplate),
    Feed,
}

fn source_kind(def: &SourceDef) -> Result<SourceKind, Error> {
    let name = def.template_name();
    if name == FEED_TEMPLATE {
        return Ok(SourceKind::Feed);
    }
    ListingTemplate::from_name(name)
        .map(SourceKind::Listing)
        .ok_or_else(|| Error::Configuration(format!("unsupported source template: {name}")))
}

/// Detail values win; listing values fill whatever the detail page lacked.
fn apply_detail(item: &mut CandidateItem, detail: DetailMetadata) {
    if let Some(title) = detail.title {
        item.title = title;
    }
    if detail.summary.is_some() {
        item.summary = detail.summary;
    }
    if let Some(image) = detail.image_url {
        let resolved = Url::parse(&item.url).ok().and_then(|base| resolve(&base, &image));
        item.image_url = Some(resolved.unwrap_or(image));
    }
    if detail.published_at.is_some() {
        item.published_at = detail.published_at;
    }
}

pub struct Crawler<S> {
    config: AppConfig,
    store: S,
    client: FetchClient,
    extractor: DetailExtractor,
    today: Option<NaiveDate>,
}

impl<S: ArticleStore> Crawler<S> {
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the tunables fail validation.
    pub fn new(config: AppConfig, store: S) -> Result<Self, Error> {
        config.validate().map_err(|e| Error::Configuration(e.to_string()))?;
        let client = FetchClient::new(FetchConfig::from(&config))?;
        Ok(Self { config, store, client, extractor: DetailExtractor::default(), today: None })
    }

    /// Pin the date recency windows are measured from.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Crawl the configured source with this id.
    pub async fn crawl_source_by_id(&self, source_id: &str) -> Result<SourceCrawlReport, Error> {
        let def = self.config.source(source_id)?;
        self.crawl_source(def).await
    }

    /// Crawl one source definition.
    ///
    /// # Errors
    ///
    /// - `Error::Configuration` for a definition without id or start URL, or
    ///   an unknown template; raised before any request is made
    /// - `Error::Fetch` when a retrying template exhausts its list-page attempts
    /// - store errors
    pub async fn crawl_source(&self, def: &SourceDef) -> Result<SourceCrawlReport, Error> {
        def.validate()?;
        let kind = source_kind(def)?;
        let source_id = def.id.trim();
        let start_urls = def.start_urls();

        let report = match kind {
            SourceKind::Listing(template) => self.crawl_listing(template, source_id, &start_urls).await?,
            SourceKind::Feed => self.ingest_feeds(&start_urls, Some(source_id)).await?,
        };

        tracing::info!(
            source = source_id,
            inserted = report.inserted,
            considered = report.considered,
            "crawl_source done"
        );
        Ok(report)
    }

    /// Crawl every configured source in order. A failing source is recorded
    /// and the rest still run.
    pub async fn crawl_all(&self) -> CrawlAllReport {
        let mut report = CrawlAllReport::default();
        for def in &self.config.sources {
            let source_id = def.id.trim().to_string();
            match self.crawl_source(def).await {
                Ok(r) => {
                    report.inserted += r.inserted;
                    report.sources.push(SourceOutcome::Crawled { source_id, inserted: r.inserted });
                }
                Err(e) => {
                    tracing::warn!(source = %source_id, error = %e, "source crawl failed");
                    report.sources.push(SourceOutcome::Failed { source_id, error: e.to_string() });
                }
            }
        }
        tracing::info!(sources = report.sources.len(), inserted = report.inserted, "crawl_all done");
        report
    }

    /// Ingest a feed without a source id. No recency window applies.
    pub async fn crawl_feed(&self, feed_url: &str) -> Result<SourceCrawlReport, Error> {
        let url = canonicalize(feed_url)?;
        let report = self.ingest_feeds(&[url.to_string()], None).await?;
        tracing::info!(
            feed = %url,
            inserted = report.inserted,
            considered = report.considered,
            "crawl_feed done"
        );
        Ok(report)
    }

    /// Search every keyword with the selected providers and store what is
    /// new and recent.
    ///
    /// # Errors
    ///
    /// - `Error::Configuration` for a blank keyword definition or unknown provider
    /// - `Error::InvalidInput` for a zero window or limit
    /// - store errors
    ///
    /// Provider failures are not errors; they are recorded on the keyword's outcome.
    pub async fn crawl_keywords(
        &self, keywords: &[KeywordDef], options: &KeywordCrawlOptions,
    ) -> Result<KeywordCrawlReport, Error> {
        if keywords.is_empty() {
            return Ok(KeywordCrawlReport::default());
        }
        for def in keywords {
            def.validate()?;
        }
        let providers = SearchProvider::resolve_all(&options.providers)?;
        if options.days == 0 {
            return Err(Error::InvalidInput("days must be at least 1".into()));
        }
        if options.max_items_per_keyword == 0 {
            return Err(Error::InvalidInput("max_items_per_keyword must be at least 1".into()));
        }

        let today = self.today();
        let mut report = KeywordCrawlReport { keywords_processed: keywords.len(), ..Default::default() };
        for def in keywords {
            let outcome = self.crawl_keyword(def, &providers, options, today).await?;
            report.inserted += outcome.inserted;
            report.per_keyword.push(outcome);
        }

        tracing::info!(keywords = report.keywords_processed, inserted = report.inserted, "crawl_keywords done");
        Ok(report)
    }

    /// `crawl_keywords` over the keywords in configuration.
    pub async fn crawl_configured_keywords(&self, options: &KeywordCrawlOptions) -> Result<KeywordCrawlReport, Error> {
        self.crawl_keywords(&self.config.keywords, options).await
    }

    async fn crawl_listing(
        &self, template: ListingTemplate, source_id: &str, start_urls: &[String],
    ) -> Result<SourceCrawlReport, Error> {
        let limit = self.config.max_links_per_source;
        let adapter = ListingAdapter::new(self.client.clone(), template, source_id, limit);

        let mut dedup = BatchDedup::new();
        let mut candidates = Vec::new();
        for start_url in start_urls {
            for item in adapter.discover(start_url).await? {
                if dedup.admit_url(&item.url) {
                    candidates.push(item);
                }
            }
        }
        candidates.truncate(limit);

        let today = self.today();
        let mut report = SourceCrawlReport::new(Some(source_id));
        for mut item in candidates {
            report.considered += 1;

            if item.needs_enrichment() {
                let detail = match adapter.fetch_detail(&item.url).await {
                    Some(html) => self.extractor.extract(&html),
                    None => DetailMetadata::default(),
                };
                apply_detail(&mut item, detail);
            }

            if !item.is_complete() {
                tracing::debug!(source = source_id, url = %item.url, "skipping item without title");
                continue;
            }
            let published = item.published_at.as_deref().and_then(parse_stored_date);
            if !is_within_window(published, today, self.config.day_window) {
                tracing::debug!(source = source_id, url = %item.url, published = ?item.published_at, "outside window");
                continue;
            }
            if self.store.exists_by_url(&item.url).await? {
                continue;
            }

            self.store.insert_article(&new_article(item, Some(source_id))).await?;
            report.inserted += 1;
            if report.inserted >= self.config.max_inserted_per_source {
                break;
            }
        }

        Ok(report)
    }

    /// One pass over every feed: candidates are pooled and deduplicated
    /// first, so the per-source limits apply to the pass as a whole.
    async fn ingest_feeds(&self, feed_urls: &[String], source_id: Option<&str>) -> Result<SourceCrawlReport, Error> {
        let limit = self.config.max_links_per_source;
        let adapter = FeedAdapter::new(self.client.clone(), limit);

        let mut dedup = BatchDedup::new();
        let mut candidates = Vec::new();
        for feed_url in feed_urls {
            for item in adapter.discover(feed_url).await? {
                if dedup.admit_url(&item.url) {
                    candidates.push(item);
                }
            }
        }
        candidates.truncate(limit);

        let mut report = SourceCrawlReport::new(source_id);
        for mut item in candidates {
            report.considered += 1;
            if self.store.exists_by_url(&item.url).await? {
                continue;
            }
            adapter.backfill_summary(&mut item).await;
            self.store.insert_article(&new_article(item, source_id)).await?;
            report.inserted += 1;
            if report.inserted >= self.config.max_inserted_per_source {
                break;
            }
        }

        Ok(report)
    }

    async fn crawl_keyword(
        &self, def: &KeywordDef, providers: &[SearchProvider], options: &KeywordCrawlOptions, today: NaiveDate,
    ) -> Result<KeywordOutcome, Error> {
        let keyword = def.keyword.trim();
        let mut outcome = KeywordOutcome {
            keyword: keyword.to_string(),
            keyword_norm: def.keyword_norm.trim().to_string(),
            ..Default::default()
        };
        let mut dedup = BatchDedup::new();

        for &provider in providers {
            if outcome.collected >= options.max_items_per_keyword {
                break;
            }

            let adapter = self.search_adapter(provider, today);
            let items = match adapter.discover(keyword).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(keyword, provider = %provider, error = %e, "keyword search failed");
                    outcome.errors.push(format!("{provider}: {e}"));
                    continue;
                }
            };

            for mut item in items {
                if !item.is_complete() || !dedup.admit(&item.url, &item.title) {
                    continue;
                }
                let published = item.published_at.as_deref().and_then(parse_stored_date);
                if !is_within_window(published, today, options.days) {
                    continue;
                }
                backfill_summary(&self.client, &self.extractor, &mut item).await;

                let summary = item
                    .summary
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| keyword.to_string());
                let record = NewKeywordArticle {
                    keyword: outcome.keyword.clone(),
                    keyword_norm: outcome.keyword_norm.clone(),
                    title: item.title,
                    url: item.url,
                    summary,
                    image_url: item.image_url,
                    published_at: item.published_at,
                };
                let (_, inserted) = self.store.insert_keyword_article(&record).await?;
                if inserted {
                    outcome.inserted += 1;
                }
                outcome.collected += 1;
                if outcome.collected >= options.max_items_per_keyword {
                    break;
                }
            }
        }

        tracing::debug!(keyword, inserted = outcome.inserted, collected = outcome.collected, "keyword done");
        Ok(outcome)
    }

    fn search_adapter(&self, provider: SearchProvider, today: NaiveDate) -> Box<dyn Adapter> {
        let limit = self.config.max_links_per_source;
        let search = self.config.search.clone();
        match provider {
            SearchProvider::Google => Box::new(GoogleNewsAdapter::new(self.client.clone(), search, limit)),
            SearchProvider::Naver => Box::new(NaverNewsAdapter::new(self.client.clone(), search, limit, today)),
        }
    }
}

fn new_article(item: CandidateItem, source_id: Option<&str>) -> NewArticle {
    NewArticle {
        source_id: source_id.map(str::to_string),
        title: item.title.trim().to_string(),
        url: item.url,
        summary: item.summary.unwrap_or_default(),
        image_url: item.image_url,
        published_at: item.published_at,
    }
}
