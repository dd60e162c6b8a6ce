//! Naver news search (HTML results page).

use async_trait::async_trait;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use newsroom_core::Error;
use newsroom_core::config::SearchConfig;

use super::{Adapter, CandidateItem};
use crate::dates::{format_date, parse_absolute_date, parse_relative_date};
use crate::extract::element_text;
use crate::fetch::FetchClient;
use crate::normalize::{BatchDedup, format_title_with_press};

pub struct NaverNewsAdapter {
    client: FetchClient,
    search: SearchConfig,
    max_items: usize,
    today: NaiveDate,
}

impl NaverNewsAdapter {
    /// `today` anchors relative dates such as "3일 전".
    pub fn new(client: FetchClient, search: SearchConfig, max_items: usize, today: NaiveDate) -> Self {
        Self { client, search, max_items, today }
    }
}

#[async_trait]
impl Adapter for NaverNewsAdapter {
    fn name(&self) -> &str {
        "naver"
    }

    async fn discover(&self, keyword: &str) -> Result<Vec<CandidateItem>, Error> {
        let url = naver_search_url(&self.search, keyword)?;
        let html = self.client.fetch_text(url.as_str()).await?;
        Ok(parse_naver_results(&html, self.today, self.max_items))
    }
}

pub fn naver_search_url(search: &SearchConfig, keyword: &str) -> Result<Url, Error> {
    Url::parse_with_params(&search.naver_search_url, &[("where", "news"), ("query", keyword.trim())])
        .map_err(|e| Error::Configuration(format!("search.naver_search_url {}: {e}", search.naver_search_url)))
}

/// Result anchors are `a.news_tit`; summary, press and date come from the
/// anchor's parent container.
pub fn parse_naver_results(html: &str, today: NaiveDate, max_items: usize) -> Vec<CandidateItem> {
    let document = Html::parse_document(html);
    let (Ok(anchors), Ok(summary_sel), Ok(press_sel)) = (
        Selector::parse("a.news_tit"),
        Selector::parse(".dsc_wrap"),
        Selector::parse(".info_group .info"),
    ) else {
        return Vec::new();
    };

    let mut dedup = BatchDedup::new();
    let mut items = Vec::new();

    for anchor in document.select(&anchors) {
        if items.len() >= max_items {
            break;
        }

        let url = anchor.value().attr("href").map(str::trim).unwrap_or_default();
        let title = anchor
            .value()
            .attr("title")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| element_text(anchor));
        if url.is_empty() || title.is_empty() || !dedup.admit_url(url) {
            continue;
        }

        let container = anchor.parent().and_then(ElementRef::wrap);
        let select_text = |selector: &Selector| {
            container
                .and_then(|c| c.select(selector).next())
                .map(element_text)
                .filter(|t| !t.is_empty())
        };
        let summary = select_text(&summary_sel);
        let press = select_text(&press_sel);

        let container_text = container.map(element_text).unwrap_or_default();
        let published_at = parse_absolute_date(&container_text)
            .or_else(|| parse_relative_date(&container_text, today))
            .map(format_date);

        items.push(CandidateItem {
            url: url.to_string(),
            title: format_title_with_press(&title, press.as_deref()),
            summary,
            image_url: None,
            published_at,
            press,
        });
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = r#"<html><body><ul>
      <li><div class="news_area">
        <div class="info_group"><a class="info">연합뉴스</a><span class="info">3일 전</span></div>
        <a class="news_tit" href="https://yna.example/1" title="러스트 1.90 출시">러스트 1.90…</a>
        <div class="dsc_wrap">새 버전이 출시되었다.</div>
      </div></li>
      <li><div class="news_area">
        <div class="info_group"><a class="info">전자신문</a><span class="info">2026.03.02.</span></div>
        <a class="news_tit" href="https://etnews.example/2">  Rust 채택 늘어  </a>
      </div></li>
      <li><div class="news_area">
        <a class="news_tit" href="https://yna.example/1" title="duplicate">dup</a>
      </div></li>
      <li><div class="news_area"><a class="news_tit" href="" title="no url">x</a></div></li>
    </ul></body></html>"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn test_search_url() {
        let url = naver_search_url(&SearchConfig::default(), "rust lang").unwrap();
        assert_eq!(url.as_str(), "https://search.naver.com/search.naver?where=news&query=rust+lang");
    }

    #[test]
    fn test_parse_results() {
        let items = parse_naver_results(RESULTS, today(), 10);
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].url, "https://yna.example/1");
        assert_eq!(items[0].title, "[연합뉴스] 러스트 1.90 출시");
        assert_eq!(items[0].press.as_deref(), Some("연합뉴스"));
        assert_eq!(items[0].summary.as_deref(), Some("새 버전이 출시되었다."));
        assert_eq!(items[0].published_at.as_deref(), Some("2026-03-07"));

        assert_eq!(items[1].title, "[전자신문] Rust 채택 늘어");
        assert!(items[1].summary.is_none());
        assert_eq!(items[1].published_at.as_deref(), Some("2026-03-02"));
    }

    #[test]
    fn test_parse_results_cap() {
        assert_eq!(parse_naver_results(RESULTS, today(), 1).len(), 1);
    }
}
