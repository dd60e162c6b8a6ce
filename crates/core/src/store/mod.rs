//! Article store: the persistence interface the pipeline writes through,
//! and its SQLite implementation.
//!
//! The pipeline owns the decision to insert; the store owns identity
//! assignment and enforces URL uniqueness as a backstop:
//!
//! - `articles.url` and `keyword_articles.url` are `UNIQUE`
//! - inserts are insert-if-absent, so repeated crawls are idempotent
//! - WAL mode with async access via tokio-rusqlite

pub mod articles;
pub mod connection;
pub mod keyword_articles;
pub mod migrations;

pub use crate::Error;

pub use articles::{Article, NewArticle};
pub use connection::NewsDb;
pub use keyword_articles::{KeywordArticle, NewKeywordArticle};

/// Store operations consumed by the ingestion pipeline.
#[async_trait::async_trait]
pub trait ArticleStore: Send + Sync {
    /// Whether an article with exactly this URL is already stored.
    async fn exists_by_url(&self, url: &str) -> Result<bool, Error>;

    /// Insert an article, returning its id. A URL that is already stored
    /// is left untouched and its existing id is returned.
    async fn insert_article(&self, article: &NewArticle) -> Result<i64, Error>;

    /// Insert a keyword article. Returns the id and whether this call created
    /// the row; the first writer for a URL wins.
    async fn insert_keyword_article(&self, article: &NewKeywordArticle) -> Result<(i64, bool), Error>;
}

#[async_trait::async_trait]
impl ArticleStore for NewsDb {
    async fn exists_by_url(&self, url: &str) -> Result<bool, Error> {
        self.article_exists(url).await
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<i64, Error> {
        self.insert_article_row(article).await
    }

    async fn insert_keyword_article(&self, article: &NewKeywordArticle) -> Result<(i64, bool), Error> {
        self.insert_keyword_article_row(article).await
    }
}
