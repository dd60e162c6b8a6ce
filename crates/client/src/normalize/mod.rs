//! URL and title normalization, and batch-local dedup.

pub mod title;
pub mod url;

use std::collections::HashSet;

pub use self::title::{canonical_title, format_title_with_press, press_suffix, strip_press_suffix};
pub use self::url::{canonicalize, resolve, unwrap_redirect};

/// Seen URLs and canonical titles for one batch.
///
/// Persistent dedup is the store's job; this only stops the same item from
/// being handled twice within a pass.
#[derive(Debug, Default)]
pub struct BatchDedup {
    urls: HashSet<String>,
    titles: HashSet<String>,
}

impl BatchDedup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `url`; false if it was already seen.
    pub fn admit_url(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    /// Record `url` and the canonical form of `title`.
    ///
    /// False, and nothing recorded, when either was already seen.
    pub fn admit(&mut self, url: &str, title: &str) -> bool {
        let key = canonical_title(title);
        if self.urls.contains(url) || (!key.is_empty() && self.titles.contains(&key)) {
            return false;
        }
        self.urls.insert(url.to_string());
        if !key.is_empty() {
            self.titles.insert(key);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
