//! Publish-date heuristics over free text and markup.
//!
//! Everything here is pure: callers pass `today` explicitly so results do not
//! depend on the wall clock.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static ABSOLUTE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\s*\.\s*(\d{2})\s*\.\s*(\d{2})\s*\.?\b").expect("absolute date regex"));

static DAYS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:일\s*전|days?\s+ago)").expect("days-ago regex"));

static YESTERDAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)어제|\byesterday\b").expect("yesterday regex"));

static TODAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)오늘|분\s*전|시간\s*전|\btoday\b|\d+\s*(?:minutes?|mins?|hours?)\s+ago")
        .expect("today regex")
});

static DATE_PUBLISHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""datePublished"\s*:\s*"([^"]+)""#).expect("datePublished regex"));

/// Format used for every date this crate stores.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// First valid `YYYY.MM.DD` date in `text`.
///
/// Whitespace around the separators and a trailing period are allowed.
/// Matches that are not calendar dates (`2026.13.40`) are skipped.
pub fn parse_absolute_date(text: &str) -> Option<NaiveDate> {
    ABSOLUTE_DATE.captures_iter(text).find_map(|caps| {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// Resolve relative phrases ("3일 전", "yesterday", "5 hours ago") against `today`.
pub fn parse_relative_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = DAYS_AGO.captures(text) {
        let days: u64 = caps[1].parse().ok()?;
        return today.checked_sub_days(Days::new(days));
    }
    if YESTERDAY.is_match(text) {
        return today.checked_sub_days(Days::new(1));
    }
    if TODAY.is_match(text) {
        return Some(today);
    }
    None
}

/// `datePublished` from the page's `application/ld+json` blocks, truncated to a date.
pub fn parse_structured_date(markup: &str) -> Option<NaiveDate> {
    structured_date(&Html::parse_document(markup))
}

pub(crate) fn structured_date(document: &Html) -> Option<NaiveDate> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;
    document.select(&selector).find_map(|script| {
        let raw: String = script.text().collect();
        DATE_PUBLISHED
            .captures_iter(&raw)
            .find_map(|caps| parse_timestamp(&caps[1]))
    })
}

/// Parse an ISO 8601 timestamp or bare date; `None` when malformed.
pub fn parse_timestamp(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Date of a stored `published_at` value: ISO date or timestamp, or `YYYY.MM.DD`.
pub fn parse_stored_date(value: &str) -> Option<NaiveDate> {
    parse_timestamp(value)
        .or_else(|| DateTime::parse_from_rfc2822(value.trim()).ok().map(|dt| dt.date_naive()))
        .or_else(|| parse_absolute_date(value))
}

/// Whether `date` falls in the inclusive window `[today - (days - 1), today]`.
///
/// A missing date is outside every window.
pub fn is_within_window(date: Option<NaiveDate>, today: NaiveDate, days: u32) -> bool {
    let Some(date) = date else {
        return false;
    };
    let span = u64::from(days.max(1) - 1);
    let Some(start) = today.checked_sub_days(Days::new(span)) else {
        return false;
    };
    start <= date && date <= today
}
