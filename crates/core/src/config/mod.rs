//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (NEWSROOM_*, nested keys separated by `__`)
//! 2. TOML config file (if NEWSROOM_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The loaded [`AppConfig`] is passed explicitly into the crawler; nothing in
//! the pipeline reads process state after construction.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod sources;
mod validation;

pub use sources::{KeywordDef, SourceDef, StartUrls};
pub use validation::ConfigError;

use crate::Error;

/// Search providers understood by the keyword crawl.
pub const KNOWN_PROVIDERS: &[&str] = &["google", "naver"];

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite article store.
    ///
    /// Set via NEWSROOM_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds for direct requests.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to read per response.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Recency window in days for listing and keyword crawls.
    #[serde(default = "default_day_window")]
    pub day_window: u32,

    /// Candidates examined per source before the pass gives up.
    #[serde(default = "default_max_links_per_source")]
    pub max_links_per_source: usize,

    /// Inserts per source after which the pass stops.
    #[serde(default = "default_max_inserted_per_source")]
    pub max_inserted_per_source: usize,

    /// Items collected (inserted or already known) per keyword.
    #[serde(default = "default_max_items_per_keyword")]
    pub max_items_per_keyword: usize,

    /// Enabled keyword search providers ("google", "naver").
    #[serde(default = "default_search_providers")]
    pub search_providers: Vec<String>,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub search: SearchConfig,

    /// Listing/feed source definitions, crawled in order by `crawl_all`.
    #[serde(default)]
    pub sources: Vec<SourceDef>,

    /// Keyword definitions used when a keyword crawl is triggered without an explicit list.
    #[serde(default)]
    pub keywords: Vec<KeywordDef>,
}

/// Retry policy for fetches that must not give up on the first failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Base backoff; attempt `n` waits `backoff_ms * n` before the next try.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { attempts: default_attempts(), backoff_ms: default_backoff_ms() }
    }
}

impl RetryConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Third-party rendering proxy used for sources that block direct crawling.
///
/// Proxying only happens when the source id is listed in `sources` and
/// `api_key` is set (NEWSROOM_PROXY__API_KEY).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_proxy_url")]
    pub api_url: String,

    #[serde(default = "default_proxy_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_proxy_sources")]
    pub sources: Vec<String>,

    #[serde(default = "default_country_code")]
    pub country_code: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_proxy_url(),
            timeout_ms: default_proxy_timeout_ms(),
            sources: default_proxy_sources(),
            country_code: default_country_code(),
        }
    }
}

impl ProxyConfig {
    /// API key, if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Endpoints of the keyword search providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_google_news_url")]
    pub google_news_url: String,

    #[serde(default = "default_google_hl")]
    pub google_hl: String,

    #[serde(default = "default_google_gl")]
    pub google_gl: String,

    #[serde(default = "default_google_ceid")]
    pub google_ceid: String,

    #[serde(default = "default_naver_search_url")]
    pub naver_search_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            google_news_url: default_google_news_url(),
            google_hl: default_google_hl(),
            google_gl: default_google_gl(),
            google_ceid: default_google_ceid(),
            naver_search_url: default_naver_search_url(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./newsroom.sqlite")
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; newsroom/0.1)".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_day_window() -> u32 {
    30
}

fn default_max_links_per_source() -> usize {
    200
}

fn default_max_inserted_per_source() -> usize {
    50
}

fn default_max_items_per_keyword() -> usize {
    30
}

fn default_search_providers() -> Vec<String> {
    vec!["google".into()]
}

fn default_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    1_000
}

fn default_proxy_url() -> String {
    "https://app.scrapingbee.com/api/v1/".into()
}

fn default_proxy_timeout_ms() -> u64 {
    20_000
}

fn default_proxy_sources() -> Vec<String> {
    vec!["i_boss".into()]
}

fn default_country_code() -> String {
    "kr".into()
}

fn default_google_news_url() -> String {
    "https://news.google.com/rss/search".into()
}

fn default_google_hl() -> String {
    "ko".into()
}

fn default_google_gl() -> String {
    "KR".into()
}

fn default_google_ceid() -> String {
    "KR:ko".into()
}

fn default_naver_search_url() -> String {
    "https://search.naver.com/search.naver".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            day_window: default_day_window(),
            max_links_per_source: default_max_links_per_source(),
            max_inserted_per_source: default_max_inserted_per_source(),
            max_items_per_keyword: default_max_items_per_keyword(),
            search_providers: default_search_providers(),
            retry: RetryConfig::default(),
            proxy: ProxyConfig::default(),
            search: SearchConfig::default(),
            sources: Vec::new(),
            keywords: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `NEWSROOM_`
    /// 2. TOML file from `NEWSROOM_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment cannot be parsed, or
    /// validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("NEWSROOM_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("NEWSROOM_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Look up a configured source by id.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSource` if no source carries the id.
    pub fn source(&self, source_id: &str) -> Result<&SourceDef, Error> {
        self.sources
            .iter()
            .find(|s| s.id.trim() == source_id)
            .ok_or_else(|| Error::UnknownSource(source_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./newsroom.sqlite"));
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.day_window, 30);
        assert_eq!(config.max_links_per_source, 200);
        assert_eq!(config.max_inserted_per_source, 50);
        assert_eq!(config.max_items_per_keyword, 30);
        assert_eq!(config.search_providers, vec!["google".to_string()]);
        assert_eq!(config.retry.attempts, 3);
        assert_eq!(config.retry.backoff(), Duration::from_secs(1));
        assert!(config.proxy.api_key.is_none());
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
        assert_eq!(config.proxy.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_proxy_key_must_be_non_blank() {
        let mut proxy = ProxyConfig::default();
        assert_eq!(proxy.sources, vec!["i_boss".to_string()]);
        assert_eq!(proxy.api_key(), None);

        proxy.api_key = Some("   ".into());
        assert_eq!(proxy.api_key(), None);

        proxy.api_key = Some(" secret ".into());
        assert_eq!(proxy.api_key(), Some("secret"));
    }

    #[test]
    fn test_source_lookup() {
        let config = AppConfig {
            sources: vec![SourceDef::new("yozm_it", StartUrls::One("https://yozm.example/magazine".into()))],
            ..Default::default()
        };
        assert!(config.source("yozm_it").is_ok());
        assert!(matches!(config.source("missing"), Err(Error::UnknownSource(_))));
    }

    #[test]
    fn test_load_layers_file_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "newsroom.toml",
                r#"
                day_window = 7
                search_providers = ["google", "naver"]

                [[sources]]
                id = "i_boss"
                start_url = "https://www.i-boss.co.kr/ab-2110"

                [[keywords]]
                keyword = "Rust"
                keyword_norm = "rust"
                "#,
            )?;
            jail.set_env("NEWSROOM_CONFIG_FILE", "newsroom.toml");
            jail.set_env("NEWSROOM_PROXY__API_KEY", "from-env");
            jail.set_env("NEWSROOM_MAX_ITEMS_PER_KEYWORD", "5");

            let config = AppConfig::load().expect("config loads");
            assert_eq!(config.day_window, 7);
            assert_eq!(config.max_items_per_keyword, 5);
            assert_eq!(config.proxy.api_key(), Some("from-env"));
            assert_eq!(config.sources.len(), 1);
            assert_eq!(config.keywords[0].keyword_norm, "rust");
            Ok(())
        });
    }
}
