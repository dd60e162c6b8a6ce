//! Metadata extraction from detail pages and listing cards.
//!
//! ### Detail pages
//! Each field is filled by the first strategy in its chain that yields a
//! non-empty value:
//! - title: `og:title` → `twitter:title` → `<meta name="title">` → first `<h1>`
//! - summary: `<meta name="description">` → `og:description`
//! - image: `og:image` → `twitter:image`
//! - published date: JSON-LD `datePublished` → date near the `<h1>` → date anywhere
//!
//! A field no strategy can fill stays `None`; callers fall back to whatever
//! the listing page offered. The "date anywhere" step is coarse and can pick
//! up an unrelated date (a footer copyright, a related-article list).
//!
//! ### Listing pages
//! - `links`: anchors matching an article pattern, deduplicated
//! - `card`: summary/date/image heuristics over the anchor's parent

pub mod card;
pub mod links;
pub mod strategy;

pub use card::{CardFields, anchor_title, card_fields, card_image, summarize};
pub use links::{ArticleLink, article_links};
pub use strategy::{DateStrategy, TextStrategy};

use scraper::{ElementRef, Html};
use serde::Serialize;

use crate::dates::format_date;

/// Fields recovered from a detail page. Dates use `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailMetadata {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub published_at: Option<String>,
}

impl DetailMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.summary.is_none() && self.image_url.is_none() && self.published_at.is_none()
    }
}

/// Ordered strategy chains, one per field.
#[derive(Debug, Clone)]
pub struct DetailExtractor {
    pub title: Vec<TextStrategy>,
    pub summary: Vec<TextStrategy>,
    pub image: Vec<TextStrategy>,
    pub date: Vec<DateStrategy>,
}

impl Default for DetailExtractor {
    fn default() -> Self {
        Self {
            title: vec![
                TextStrategy::MetaProperty("og:title"),
                TextStrategy::MetaProperty("twitter:title"),
                TextStrategy::MetaName("title"),
                TextStrategy::FirstHeading,
            ],
            summary: vec![TextStrategy::MetaName("description"), TextStrategy::MetaProperty("og:description")],
            image: vec![TextStrategy::MetaProperty("og:image"), TextStrategy::MetaProperty("twitter:image")],
            date: vec![DateStrategy::StructuredData, DateStrategy::HeadingContainer, DateStrategy::PageText],
        }
    }
}

impl DetailExtractor {
    pub fn extract(&self, markup: &str) -> DetailMetadata {
        let document = Html::parse_document(markup);
        DetailMetadata {
            title: first_text(&self.title, &document),
            summary: first_text(&self.summary, &document),
            image_url: first_text(&self.image, &document),
            published_at: self.date.iter().find_map(|s| s.apply(&document)).map(format_date),
        }
    }

    /// Summary chain only, for feed items that arrive without one.
    pub fn extract_summary(&self, markup: &str) -> Option<String> {
        first_text(&self.summary, &Html::parse_document(markup))
    }
}

/// Extract with the default chains.
pub fn extract_detail(markup: &str) -> DetailMetadata {
    DetailExtractor::default().extract(markup)
}

fn first_text(chain: &[TextStrategy], document: &Html) -> Option<String> {
    chain.iter().find_map(|s| s.apply(document))
}

/// Trimmed text nodes joined by single spaces.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain text of an HTML fragment (feed summaries often carry markup).
pub fn fragment_text(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    element_text(fragment.root_element())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_page() {
        let html = r#"<html><head>
            <meta property="og:title" content="Rust in production">
            <meta name="description" content="How a team moved to Rust.">
            <meta property="og:image" content="https://cdn.example/cover.png">
            <script type="application/ld+json">{"datePublished": "2026-03-05T09:00:00+09:00"}</script>
            </head><body><h1>Ignored heading</h1></body></html>"#;

        let meta = extract_detail(html);
        assert_eq!(meta.title.as_deref(), Some("Rust in production"));
        assert_eq!(meta.summary.as_deref(), Some("How a team moved to Rust."));
        assert_eq!(meta.image_url.as_deref(), Some("https://cdn.example/cover.png"));
        assert_eq!(meta.published_at.as_deref(), Some("2026-03-05"));
    }

    #[test]
    fn test_fallbacks() {
        let html = r#"<html><head>
            <meta name="twitter:title" content="From twitter">
            <meta property="og:description" content="From og">
            <meta name="twitter:image" content="https://cdn.example/t.png">
            </head><body><article><h1>Heading</h1><time>2026.03.01</time></article></body></html>"#;

        let meta = extract_detail(html);
        assert_eq!(meta.title.as_deref(), Some("From twitter"));
        assert_eq!(meta.summary.as_deref(), Some("From og"));
        assert_eq!(meta.image_url.as_deref(), Some("https://cdn.example/t.png"));
        assert_eq!(meta.published_at.as_deref(), Some("2026-03-01"));
    }

    #[test]
    fn test_heading_as_last_resort_title() {
        let meta = extract_detail("<html><body><h1>  Only heading </h1></body></html>");
        assert_eq!(meta.title.as_deref(), Some("Only heading"));
    }

    #[test]
    fn test_metadata_free_page_is_empty() {
        let meta = extract_detail("<html><body><p>nothing useful</p></body></html>");
        assert!(meta.is_empty());
        assert_eq!(meta, DetailMetadata::default());
    }

    #[test]
    fn test_custom_chain() {
        let extractor = DetailExtractor { title: vec![TextStrategy::FirstHeading], ..DetailExtractor::default() };
        let html = r#"<html><head><meta property="og:title" content="OG"></head><body><h1>H1</h1></body></html>"#;
        assert_eq!(extractor.extract(html).title.as_deref(), Some("H1"));
    }

    #[test]
    fn test_fragment_text() {
        assert_eq!(fragment_text("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(fragment_text("plain"), "plain");
    }
}
