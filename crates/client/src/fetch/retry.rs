//! Bounded retry with linear backoff.

use std::future::Future;
use std::time::Duration;

use newsroom_core::Error;
use newsroom_core::config::RetryConfig;

/// How many times to try and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    /// Wait before attempt `n + 1` is `backoff * n`.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, backoff: Duration) -> Self {
        Self { attempts: attempts.max(1), backoff }
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.attempts, config.backoff())
    }
}

/// Labels a retrying fetch for logs and for the error raised on exhaustion.
#[derive(Debug, Clone, Copy)]
pub struct FetchContext<'a> {
    pub source_id: &'a str,
    /// `list` or `detail` for listing sources.
    pub stage: &'a str,
}

impl<'a> FetchContext<'a> {
    pub fn new(source_id: &'a str, stage: &'a str) -> Self {
        Self { source_id, stage }
    }
}

/// Run `op` until it succeeds or the policy's attempts are spent.
///
/// `op` receives the 1-based attempt number. Every failure is logged as
/// `crawl_retry`; exhaustion is logged as `crawl_fail` and surfaces as
/// `Error::Fetch` carrying the context, the URL and the attempt count.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy, ctx: &FetchContext<'_>, url: &str, proxy: bool, mut op: F,
) -> Result<T, Error>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let attempts = policy.attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(
                    source = ctx.source_id,
                    stage = ctx.stage,
                    attempt,
                    attempts,
                    url,
                    proxy,
                    error = %e,
                    "crawl_retry"
                );
                last_error = e.to_string();
                if attempt < attempts {
                    tokio::time::sleep(policy.delay_after(attempt)).await;
                }
            }
        }
    }

    tracing::error!(source = ctx.source_id, stage = ctx.stage, url, attempts, "crawl_fail");

    Err(Error::Fetch {
        source_id: ctx.source_id.to_string(),
        stage: ctx.stage.to_string(),
        url: url.to_string(),
        attempts,
        reason: last_error,
    })
}
