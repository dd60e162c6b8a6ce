//! URL handling: redirect-wrapper unwrapping, relative resolution, and
//! canonicalization of caller-supplied URLs.

use newsroom_core::Error;
use url::Url;

/// Replace a redirect wrapper with the URL carried in its `url` query parameter.
///
/// Anything that doesn't parse, or has no non-empty `url` parameter, comes
/// back trimmed but otherwise unchanged.
pub fn unwrap_redirect(input: &str) -> String {
    let trimmed = input.trim();
    let Ok(parsed) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };

    parsed
        .query_pairs()
        .find(|(key, value)| key == "url" && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Resolve `href` against the page it was found on.
pub fn resolve(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok().map(|u| u.to_string())
}

/// Canonicalize a caller-supplied URL (feed or start URL).
///
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
///
/// Article URLs are never passed through here; they are stored as discovered.
pub fn canonicalize(input: &str) -> Result<Url, Error> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("empty URL".into()));
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };
    let mut parsed = Url::parse(&url_str).map_err(|e| Error::InvalidUrl(format!("{trimmed}: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!("unsupported scheme: {}", parsed.scheme())));
    }

    if let Some(host) = parsed.host_str().map(str::to_lowercase) {
        parsed
            .set_host(Some(&host))
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;
    }
    parsed.set_fragment(None);

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_redirect_wrapper() {
        assert_eq!(
            unwrap_redirect("https://search.example/url?url=https%3A%2F%2Freal.example%2Fa"),
            "https://real.example/a"
        );
    }

    #[test]
    fn test_unwrap_redirect_with_other_params() {
        assert_eq!(
            unwrap_redirect("https://news.google.com/url?sa=t&url=https://real.example/b?x=1&ct=ga"),
            "https://real.example/b?x=1"
        );
    }

    #[test]
    fn test_unwrap_redirect_passthrough() {
        assert_eq!(unwrap_redirect("https://real.example/a?id=3"), "https://real.example/a?id=3");
        assert_eq!(unwrap_redirect("https://real.example/a?url="), "https://real.example/a?url=");
        assert_eq!(unwrap_redirect(" not a url "), "not a url");
    }

    #[test]
    fn test_resolve_relative() {
        let base = Url::parse("https://yozm.example/magazine/list/").unwrap();
        assert_eq!(resolve(&base, "/magazine/detail/12/").as_deref(), Some("https://yozm.example/magazine/detail/12/"));
        assert_eq!(resolve(&base, "img/a.png").as_deref(), Some("https://yozm.example/magazine/list/img/a.png"));
        assert_eq!(resolve(&base, "  "), None);
    }

    #[test]
    fn test_canonicalize_defaults_and_lowercases() {
        let url = canonicalize("  FEEDS.Example.com/rss#top ").unwrap();
        assert_eq!(url.as_str(), "https://feeds.example.com/rss");
    }

    #[test]
    fn test_canonicalize_preserves_query() {
        let url = canonicalize("https://example.com/rss?a=1&b=2").unwrap();
        assert_eq!(url.query(), Some("a=1&b=2"));
    }

    #[test]
    fn test_canonicalize_rejects() {
        assert!(matches!(canonicalize("   "), Err(Error::InvalidInput(_))));
        assert!(matches!(canonicalize("file:///etc/passwd"), Err(Error::InvalidUrl(_))));
    }
}
