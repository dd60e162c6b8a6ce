//! Article link harvesting from listing pages.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// An anchor whose raw href matched an article pattern.
#[derive(Debug, Clone)]
pub struct ArticleLink<'a> {
    /// Href resolved against the listing page
    pub url: String,
    pub anchor: ElementRef<'a>,
}

/// Anchors whose `href` matches `pattern`, in document order.
///
/// The pattern is tested against the raw attribute; the stored URL is the
/// href resolved against `base_url`. Duplicates (by resolved URL) keep the
/// first anchor.
pub fn article_links<'a>(document: &'a Html, base_url: &Url, pattern: &Regex) -> Vec<ArticleLink<'a>> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !pattern.is_match(href) {
            continue;
        }

        let resolved = match base_url.join(href.trim()) {
            Ok(u) => u.to_string(),
            Err(_) => continue,
        };

        if !seen.insert(resolved.clone()) {
            continue;
        }

        links.push(ArticleLink { url: resolved, anchor });
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(html: &str, base: &str, pattern: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        let base = Url::parse(base).unwrap();
        let re = Regex::new(pattern).unwrap();
        article_links(&doc, &base, &re).into_iter().map(|l| l.url).collect()
    }

    #[test]
    fn test_matches_and_resolves() {
        let html = r#"
            <a href="/magazine/detail/101/">One</a>
            <a href="/magazine/list/2">Next page</a>
            <a href="https://yozm.example/magazine/detail/102/">Two</a>
        "#;
        assert_eq!(
            urls(html, "https://yozm.example/magazine/list/", "/magazine/detail/"),
            vec!["https://yozm.example/magazine/detail/101/", "https://yozm.example/magazine/detail/102/"]
        );
    }

    #[test]
    fn test_duplicates_keep_first_anchor() {
        let html = r#"
            <div><a href="/ab-6141-100"><img alt="thumb"></a></div>
            <div><a href="/ab-6141-100">Headline</a></div>
        "#;
        let doc = Html::parse_document(html);
        let base = Url::parse("https://iboss.example/ab-6141").unwrap();
        let re = Regex::new(r"/ab-6141-\d+").unwrap();
        let links = article_links(&doc, &base, &re);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://iboss.example/ab-6141-100");
        assert!(links[0].anchor.text().collect::<String>().trim().is_empty());
    }

    #[test]
    fn test_pattern_tested_on_raw_href() {
        let html = r#"<a href="ab-6141-7">relative</a><a href="/ab-9-7">other category</a>"#;
        assert!(urls(html, "https://iboss.example/ab-6141", r"/ab-6141-\d+").is_empty());
    }

    #[test]
    fn test_no_links() {
        assert!(urls("<p>No links here</p>", "https://x.example", "/magazine/detail/").is_empty());
    }
}
