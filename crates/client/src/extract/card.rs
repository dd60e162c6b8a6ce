//! Listing-card heuristics.
//!
//! A card is the parent element of an article anchor on a listing page. Its
//! text supplies a summary and a date; its first image supplies a thumbnail.
//! The summary rule (first non-date segment of at least ten characters) is a
//! heuristic and will sometimes pick up bylines or category labels.

use chrono::NaiveDate;
use scraper::{ElementRef, Selector};
use url::Url;

use super::element_text;
use crate::dates::parse_absolute_date;
use crate::normalize::resolve;

const MIN_SUMMARY_CHARS: usize = 10;
const IMAGE_ATTRS: [&str; 3] = ["src", "data-src", "data-original"];

/// Fields read from a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFields {
    pub summary: Option<String>,
    pub published_at: Option<NaiveDate>,
    pub image_url: Option<String>,
}

pub fn card_fields(card: ElementRef<'_>, base_url: &Url) -> CardFields {
    let text = element_text(card);
    CardFields {
        summary: summarize(&text),
        published_at: parse_absolute_date(&text),
        image_url: card_image(card, base_url),
    }
}

/// First segment (split on `|`, `·` or newline) that is long enough and not
/// a date; the whole text when none qualifies.
pub fn summarize(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let segment = text
        .split(['|', '\u{00b7}', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .find(|part| parse_absolute_date(part).is_none() && part.chars().count() >= MIN_SUMMARY_CHARS)
        .unwrap_or(text);
    Some(segment.to_string())
}

/// First image's `src`, `data-src` or `data-original`, resolved against the page.
pub fn card_image(card: ElementRef<'_>, base_url: &Url) -> Option<String> {
    let selector = Selector::parse("img").ok()?;
    let img = card.select(&selector).next()?;
    IMAGE_ATTRS
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .find(|v| !v.trim().is_empty())
        .and_then(|src| resolve(base_url, src))
}

/// Anchor text, falling back to the `alt` of an image inside it.
pub fn anchor_title(anchor: ElementRef<'_>) -> String {
    let text = element_text(anchor);
    if !text.is_empty() {
        return text;
    }
    Selector::parse("img")
        .ok()
        .and_then(|selector| anchor.select(&selector).next())
        .and_then(|img| img.value().attr("alt"))
        .map(|alt| alt.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        doc.select(&Selector::parse(css).unwrap()).next().unwrap()
    }

    #[test]
    fn test_summarize_skips_dates_and_short_segments() {
        assert_eq!(
            summarize("IT | 2026.03.08 | How we migrated our build to Rust").as_deref(),
            Some("How we migrated our build to Rust")
        );
    }

    #[test]
    fn test_summarize_falls_back_to_whole_text() {
        assert_eq!(summarize("short · tiny").as_deref(), Some("short · tiny"));
        assert_eq!(summarize("   "), None);
    }

    #[test]
    fn test_card_fields() {
        let html = r#"<div class="card">
            <img data-src="/thumbs/1.jpg">
            <a href="/magazine/detail/1/">Title</a>
            <p>A long enough summary line</p>
            <span>2026.03.09</span>
        </div>"#;
        let doc = Html::parse_fragment(html);
        let base = Url::parse("https://yozm.example/magazine/list/").unwrap();
        let fields = card_fields(first(&doc, "div.card"), &base);

        assert_eq!(fields.image_url.as_deref(), Some("https://yozm.example/thumbs/1.jpg"));
        assert_eq!(fields.published_at, NaiveDate::from_ymd_opt(2026, 3, 9));
        assert!(fields.summary.unwrap().contains("A long enough summary line"));
    }

    #[test]
    fn test_image_attribute_order() {
        let html = r#"<div><img src="" data-src="a.jpg" data-original="b.jpg"></div>"#;
        let doc = Html::parse_fragment(html);
        let base = Url::parse("https://x.example/").unwrap();
        assert_eq!(card_image(first(&doc, "div"), &base).as_deref(), Some("https://x.example/a.jpg"));
    }

    #[test]
    fn test_anchor_title_falls_back_to_alt() {
        let html = r#"<div>
            <a href="/ab-1-2"><img src="x.jpg" alt=" Image Title "></a><a href="/ab-1-3"> Text </a>
        </div>"#;
        let doc = Html::parse_fragment(html);
        let anchors: Vec<_> = doc.select(&Selector::parse("a").unwrap()).collect();
        assert_eq!(anchor_title(anchors[0]), "Image Title");
        assert_eq!(anchor_title(anchors[1]), "Text");
    }
}
