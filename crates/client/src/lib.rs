//! Client code for newsroom.
//!
//! This crate provides the HTTP fetch layer, page and feed adapters, metadata
//! extraction, and the crawl orchestrator shared by the server and CLI.

pub mod adapters;
pub mod crawl;
pub mod dates;
pub mod extract;
pub mod fetch;
pub mod normalize;

pub use adapters::{Adapter, CandidateItem, SearchProvider};
pub use crawl::{
    CrawlAllReport, Crawler, KeywordCrawlOptions, KeywordCrawlReport, KeywordOutcome, SourceCrawlReport, SourceOutcome,
};
pub use extract::{DetailExtractor, DetailMetadata, extract_detail};
pub use fetch::{FetchClient, FetchConfig, FetchResponse};
