//! HTTP fetch layer.
//!
//! ### Modes
//! - `fetch` / `fetch_text`: one attempt, direct, non-success status is an error
//! - `fetch_best_effort`: one attempt, any failure becomes `None`
//! - `fetch_with_retry`: bounded attempts with linear backoff, routed through
//!   the scraping proxy when the source is flagged for it and a key is set
//!
//! ### Limits
//! - Every request carries a timeout (proxy requests use the proxy timeout)
//! - Bodies larger than `max_bytes` are rejected

pub mod retry;

use reqwest::{Client, Url, header};
use std::time::{Duration, Instant};

pub use retry::{FetchContext, RetryPolicy, retry_with_backoff};

use newsroom_core::{AppConfig, Error};

/// Scraping proxy settings resolved from configuration.
#[derive(Debug, Clone)]
pub struct ProxySettings {
    pub api_url: String,
    pub api_key: String,
    pub country_code: String,
    pub timeout: Duration,
    /// Source ids whose retrying fetches go through the proxy.
    pub sources: Vec<String>,
}

impl ProxySettings {
    pub fn applies_to(&self, source_id: &str) -> bool {
        self.sources.iter().any(|s| s == source_id)
    }

    /// Proxy endpoint carrying the target as its `url` parameter.
    pub fn request_url(&self, target: &str) -> Result<Url, Error> {
        Url::parse_with_params(
            &self.api_url,
            &[
                ("api_key", self.api_key.as_str()),
                ("url", target),
                ("render_js", "false"),
                ("premium_proxy", "true"),
                ("country_code", self.country_code.as_str()),
            ],
        )
        .map_err(|e| Error::InvalidUrl(format!("proxy endpoint {}: {e}", self.api_url)))
    }
}

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub max_bytes: usize,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// `None` unless an API key is configured.
    pub proxy: Option<ProxySettings>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        let proxy = config.proxy.api_key().map(|key| ProxySettings {
            api_url: config.proxy.api_url.clone(),
            api_key: key.to_string(),
            country_code: config.proxy.country_code.clone(),
            timeout: config.proxy.timeout(),
            sources: config.proxy.sources.clone(),
        });

        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            retry: RetryPolicy::from(&config.retry),
            proxy,
        }
    }
}

/// Body of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP fetch client. Clones share the connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch a URL once, directly.
    pub async fn fetch(&self, url: &str) -> Result<FetchResponse, Error> {
        let url = Url::parse(url.trim()).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        self.send(url, self.config.timeout).await
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String, Error> {
        Ok(self.fetch(url).await?.text())
    }

    /// Fetch once and swallow any failure.
    pub async fn fetch_best_effort(&self, url: &str) -> Option<String> {
        match self.fetch_text(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!(url, error = %e, "best-effort fetch failed");
                None
            }
        }
    }

    /// Fetch with bounded retries, via the proxy when `ctx.source_id` is flagged.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` once every attempt has failed.
    pub async fn fetch_with_retry(&self, url: &str, ctx: &FetchContext<'_>) -> Result<String, Error> {
        let proxy = self.config.proxy.as_ref().filter(|p| p.applies_to(ctx.source_id));
        let (request_url, timeout) = match proxy {
            Some(p) => (p.request_url(url)?, p.timeout),
            None => {
                let direct = Url::parse(url.trim()).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
                (direct, self.config.timeout)
            }
        };

        retry_with_backoff(&self.config.retry, ctx, url, proxy.is_some(), |_| {
            let request_url = request_url.clone();
            async move { self.send(request_url, timeout).await.map(|r| r.text()) }
        })
        .await
    }

    async fn send(&self, url: Url, timeout: Duration) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.clone())
            .timeout(timeout)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchTimeout(format!("{url}: {e}"))
                } else {
                    Error::HttpError(format!("network error: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length() {
            check_len(len as usize, self.config.max_bytes)?;
        }

        let final_url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::HttpError(format!("failed to read response: {e}")))?;
        check_len(body.len(), self.config.max_bytes)?;

        let fetch_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(url = %url, final_url = %final_url, fetch_ms, bytes = body.len(), "fetched");

        Ok(FetchResponse { body: body.to_vec() })
    }
}

fn check_len(len: usize, max: usize) -> Result<(), Error> {
    if len > max {
        return Err(Error::FetchTooLarge(format!("{len} bytes exceeds {max}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn test_config() -> FetchConfig {
        FetchConfig { retry: RetryPolicy::new(3, Duration::ZERO), ..FetchConfig::default() }
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "Mozilla/5.0 (compatible; newsroom/0.1)");
        assert_eq!(config.timeout, Duration::from_millis(10_000));
        assert_eq!(config.retry.attempts, 3);
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_proxy_request_url() {
        let mut app = AppConfig::default();
        app.proxy.api_key = Some("secret".into());
        let config = FetchConfig::from(&app);
        let proxy = config.proxy.unwrap();
        assert!(proxy.applies_to("i_boss"));
        assert!(!proxy.applies_to("yozm_it"));
        assert_eq!(proxy.timeout, Duration::from_millis(20_000));

        let url = proxy.request_url("https://www.i-boss.co.kr/ab-6141-1").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("api_key".into(), "secret".into())));
        assert!(pairs.contains(&("url".into(), "https://www.i-boss.co.kr/ab-6141-1".into())));
        assert!(pairs.contains(&("render_js".into(), "false".into())));
        assert!(pairs.contains(&("premium_proxy".into(), "true".into())));
        assert!(pairs.contains(&("country_code".into(), "kr".into())));
    }

    #[test]
    fn test_blank_key_disables_proxy() {
        let mut app = AppConfig::default();
        app.proxy.api_key = Some("  ".into());
        assert!(FetchConfig::from(&app).proxy.is_none());
    }

    #[tokio::test]
    async fn test_fetch_text_ok() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html>ok</html>")
            .expect(2)
            .create_async()
            .await;

        let client = FetchClient::new(test_config()).unwrap();
        let body = client.fetch_text(&format!("{}/page", server.url())).await.unwrap();
        assert_eq!(body, "<html>ok</html>");

        let response = client.fetch(&format!("{}/page", server.url())).await.unwrap();
        assert_eq!(response.body, b"<html>ok</html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_is_http_error() {
        let mut server = Server::new_async().await;
        server.mock("GET", "/gone").with_status(404).create_async().await;

        let client = FetchClient::new(test_config()).unwrap();
        let result = client.fetch(&format!("{}/gone", server.url())).await;
        assert!(matches!(result, Err(Error::HttpError(msg)) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_best_effort_swallows_errors() {
        let mut server = Server::new_async().await;
        server.mock("GET", "/down").with_status(503).create_async().await;

        let client = FetchClient::new(test_config()).unwrap();
        assert!(client.fetch_best_effort(&format!("{}/down", server.url())).await.is_none());
    }

    #[tokio::test]
    async fn test_body_over_limit_rejected() {
        let mut server = Server::new_async().await;
        server.mock("GET", "/big").with_status(200).with_body("x".repeat(64)).create_async().await;

        let client = FetchClient::new(FetchConfig { max_bytes: 16, ..test_config() }).unwrap();
        let result = client.fetch(&format!("{}/big", server.url())).await;
        assert!(matches!(result, Err(Error::FetchTooLarge(_))));
    }

    #[tokio::test]
    async fn test_retry_exhaustion_makes_three_attempts() {
        let mut server = Server::new_async().await;
        let mock = server.mock("GET", "/list").with_status(500).expect(3).create_async().await;

        let client = FetchClient::new(test_config()).unwrap();
        let ctx = FetchContext::new("i_boss", "list");
        let result = client.fetch_with_retry(&format!("{}/list", server.url()), &ctx).await;

        assert!(matches!(result, Err(Error::Fetch { attempts: 3, .. })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_retry_goes_through_proxy() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_key".into(), "k".into()),
                Matcher::UrlEncoded("url".into(), "https://www.i-boss.co.kr/ab-6141".into()),
            ]))
            .with_status(200)
            .with_body("proxied")
            .expect(1)
            .create_async()
            .await;

        let mut app = AppConfig::default();
        app.proxy.api_key = Some("k".into());
        app.proxy.api_url = format!("{}/api/v1/", server.url());
        let config = FetchConfig { retry: RetryPolicy::new(3, Duration::ZERO), ..FetchConfig::from(&app) };

        let client = FetchClient::new(config).unwrap();
        let ctx = FetchContext::new("i_boss", "list");
        let body = client.fetch_with_retry("https://www.i-boss.co.kr/ab-6141", &ctx).await.unwrap();
        assert_eq!(body, "proxied");
        mock.assert_async().await;
    }
}
