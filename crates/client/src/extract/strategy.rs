//! Single extraction strategies. Chains of these make up a `DetailExtractor`.

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use super::element_text;
use crate::dates::{parse_absolute_date, structured_date};

/// Where a text field can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStrategy {
    /// `<meta property=KEY>` or `<meta name=KEY>` content.
    MetaProperty(&'static str),
    /// `<meta name=KEY>` content only.
    MetaName(&'static str),
    /// Text of the first `<h1>`.
    FirstHeading,
}

impl TextStrategy {
    /// Trimmed, non-empty value, or `None`.
    pub fn apply(&self, document: &Html) -> Option<String> {
        let value = match self {
            TextStrategy::MetaProperty(key) => {
                meta_content(document, &format!(r#"meta[property="{key}"], meta[name="{key}"]"#))
            }
            TextStrategy::MetaName(key) => meta_content(document, &format!(r#"meta[name="{key}"]"#)),
            TextStrategy::FirstHeading => first_heading(document).map(element_text),
        }?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}

/// Where a publish date can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    /// `datePublished` in JSON-LD.
    StructuredData,
    /// `YYYY.MM.DD` in the text of the first `<h1>`'s parent.
    HeadingContainer,
    /// `YYYY.MM.DD` anywhere in the page text.
    PageText,
}

impl DateStrategy {
    pub fn apply(&self, document: &Html) -> Option<NaiveDate> {
        match self {
            DateStrategy::StructuredData => structured_date(document),
            DateStrategy::HeadingContainer => {
                let heading = first_heading(document)?;
                let container = heading.parent().and_then(ElementRef::wrap).unwrap_or(heading);
                parse_absolute_date(&element_text(container))
            }
            DateStrategy::PageText => parse_absolute_date(&element_text(document.root_element())),
        }
    }
}

fn meta_content(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .filter_map(|meta| meta.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

fn first_heading(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("h1").ok()?;
    document.select(&selector).next()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
        <meta property="og:title" content="  OG Title ">
        <meta name="twitter:title" content="Twitter Title">
        <meta name="title" content="Plain Title">
        <meta name="description" content="">
        <meta property="og:description" content="OG description">
        </head><body>
        <div class="header"><h1>Heading <b>Title</b></h1><span>2026.03.08</span></div>
        <footer>2026.01.01</footer>
        </body></html>"#;

    #[test]
    fn test_meta_property() {
        let doc = Html::parse_document(PAGE);
        assert_eq!(TextStrategy::MetaProperty("og:title").apply(&doc).as_deref(), Some("OG Title"));
        assert_eq!(TextStrategy::MetaProperty("twitter:title").apply(&doc).as_deref(), Some("Twitter Title"));
    }

    #[test]
    fn test_meta_name_ignores_property() {
        let doc = Html::parse_document(PAGE);
        assert_eq!(TextStrategy::MetaName("title").apply(&doc).as_deref(), Some("Plain Title"));
        assert_eq!(TextStrategy::MetaName("og:description").apply(&doc), None);
    }

    #[test]
    fn test_empty_content_is_none() {
        let doc = Html::parse_document(PAGE);
        assert_eq!(TextStrategy::MetaName("description").apply(&doc), None);
    }

    #[test]
    fn test_first_heading() {
        let doc = Html::parse_document(PAGE);
        assert_eq!(TextStrategy::FirstHeading.apply(&doc).as_deref(), Some("Heading Title"));
    }

    #[test]
    fn test_heading_container_date() {
        let doc = Html::parse_document(PAGE);
        assert_eq!(DateStrategy::HeadingContainer.apply(&doc), NaiveDate::from_ymd_opt(2026, 3, 8));
    }

    #[test]
    fn test_page_text_date() {
        let doc = Html::parse_document("<html><body><p>no heading</p><p>2026.02.14.</p></body></html>");
        assert_eq!(DateStrategy::HeadingContainer.apply(&doc), None);
        assert_eq!(DateStrategy::PageText.apply(&doc), NaiveDate::from_ymd_opt(2026, 2, 14));
    }
}
