//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::{AppConfig, KNOWN_PROVIDERS};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// Source and keyword definitions are not checked here; each crawl
    /// validates the definition it is handed so one bad entry cannot block
    /// the others.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `day_window`, `retry.attempts` or any item limit is 0
    /// - `retry.attempts` exceeds 10
    /// - `search_providers` names an unknown provider
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.day_window == 0 {
            return Err(ConfigError::Invalid { field: "day_window".into(), reason: "must be at least 1".into() });
        }

        for (field, value) in [
            ("max_links_per_source", self.max_links_per_source),
            ("max_inserted_per_source", self.max_inserted_per_source),
            ("max_items_per_keyword", self.max_items_per_keyword),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be greater than 0".into() });
            }
        }

        if self.retry.attempts == 0 || self.retry.attempts > 10 {
            return Err(ConfigError::Invalid {
                field: "retry.attempts".into(),
                reason: "must be between 1 and 10".into(),
            });
        }

        if let Some(unknown) = self
            .search_providers
            .iter()
            .find(|p| !KNOWN_PROVIDERS.contains(&p.trim().to_lowercase().as_str()))
        {
            return Err(ConfigError::Invalid {
                field: "search_providers".into(),
                reason: format!("unknown provider: {unknown}"),
            });
        }

        if !self.proxy.sources.is_empty() && self.proxy.api_key().is_none() {
            tracing::debug!(
                proxied_sources = self.proxy.sources.len(),
                "proxy.sources set without proxy.api_key; those sources are fetched directly"
            );
        }

        Ok(())
    }
}
