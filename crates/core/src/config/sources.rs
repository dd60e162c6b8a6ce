//! Source and keyword definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// One or more start points for a source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StartUrls {
    One(String),
    Many(Vec<String>),
}

impl Default for StartUrls {
    fn default() -> Self {
        StartUrls::Many(Vec::new())
    }
}

/// A crawlable source: a listing page template or a feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceDef {
    #[serde(default)]
    pub id: String,

    /// Display name, unused by the pipeline.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub start_url: StartUrls,

    /// Template override; the id selects the template when absent.
    #[serde(default)]
    pub template: Option<String>,
}

impl SourceDef {
    pub fn new(id: impl Into<String>, start_url: StartUrls) -> Self {
        Self { id: id.into(), name: None, start_url, template: None }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Trimmed, non-empty start URLs in declaration order.
    pub fn start_urls(&self) -> Vec<String> {
        let raw: Vec<&str> = match &self.start_url {
            StartUrls::One(url) => vec![url.as_str()],
            StartUrls::Many(urls) => urls.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Name of the template that handles this source.
    pub fn template_name(&self) -> &str {
        self.template
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.id.trim())
    }

    /// Check that the definition has an id and at least one usable start URL.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` naming the missing field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.id.trim().is_empty() || self.start_urls().is_empty() {
            return Err(Error::Configuration("source must include id and start_url".into()));
        }
        for url in self.start_urls() {
            let parsed = url::Url::parse(&url)
                .map_err(|e| Error::Configuration(format!("source {}: invalid start_url {url}: {e}", self.id)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::Configuration(format!(
                    "source {}: unsupported scheme in start_url {url}",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// A keyword to search for, with the normalized key its articles are grouped under.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct KeywordDef {
    #[serde(default)]
    pub keyword: String,

    #[serde(default)]
    pub keyword_norm: String,
}

impl KeywordDef {
    pub fn new(keyword: impl Into<String>, keyword_norm: impl Into<String>) -> Self {
        Self { keyword: keyword.into(), keyword_norm: keyword_norm.into() }
    }

    /// # Errors
    ///
    /// Returns `Error::Configuration` when either field is blank.
    pub fn validate(&self) -> Result<(), Error> {
        if self.keyword.trim().is_empty() || self.keyword_norm.trim().is_empty() {
            return Err(Error::Configuration(format!(
                "keyword definition must include keyword and keyword_norm (got {:?}/{:?})",
                self.keyword, self.keyword_norm
            )));
        }
        Ok(())
    }
}
