//! Article rows: insert-if-absent keyed by URL, plus read helpers.

use super::connection::NewsDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

const ARTICLE_COLUMNS: &str = "id, source_id, title, url, summary, image_url, published_at, created_at";

/// A stored article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub id: i64,
    /// `None` for ungrouped feed ingestion.
    pub source_id: Option<String>,
    pub title: String,
    pub url: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub published_at: Option<String>,
    pub created_at: String,
}

/// An article the pipeline has decided to insert.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewArticle {
    pub source_id: Option<String>,
    pub title: String,
    pub url: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub published_at: Option<String>,
}

impl Article {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            source_id: row.get(1)?,
            title: row.get(2)?,
            url: row.get(3)?,
            summary: row.get(4)?,
            image_url: row.get(5)?,
            published_at: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl NewsDb {
    pub async fn article_exists(&self, url: &str) -> Result<bool, Error> {
        let url = url.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM articles WHERE url = ?1)",
                    params![url],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await
            .map_err(Error::from)
    }

    /// Insert unless the URL is already stored; returns the row id either way.
    ///
    /// The check and the insert run on the connection thread back to back,
    /// so a concurrent writer can't produce a second row for the URL.
    pub async fn insert_article_row(&self, article: &NewArticle) -> Result<i64, Error> {
        let article = article.clone();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<i64, Error> {
                let changed = conn.execute(
                    "INSERT INTO articles (source_id, title, url, summary, image_url, published_at, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                     ON CONFLICT(url) DO NOTHING",
                    params![
                        &article.source_id,
                        &article.title,
                        &article.url,
                        &article.summary,
                        &article.image_url,
                        &article.published_at,
                        now,
                    ],
                )?;
                if changed == 1 {
                    return Ok(conn.last_insert_rowid());
                }
                let id: i64 =
                    conn.query_row("SELECT id FROM articles WHERE url = ?1", params![article.url], |row| row.get(0))?;
                Ok(id)
            })
            .await
            .map_err(Error::from)
    }

    pub async fn get_article_by_url(&self, url: &str) -> Result<Option<Article>, Error> {
        let url = url.to_string();
        self.conn
            .call(move |conn| -> Result<Option<Article>, Error> {
                let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE url = ?1");
                match conn.query_row(&sql, params![url], Article::from_row) {
                    Ok(a) => Ok(Some(a)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    pub async fn count_articles(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Newest first by insertion order.
    pub async fn list_recent_articles(&self, limit: usize) -> Result<Vec<Article>, Error> {
        let limit = limit as i64;
        self.conn
            .call(move |conn| -> Result<Vec<Article>, Error> {
                let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY id DESC LIMIT ?1");
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![limit], Article::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(Error::from)
    }
}
