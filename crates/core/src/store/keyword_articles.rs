//! Keyword article rows, a namespace separate from `articles`.

use super::connection::NewsDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordArticle {
    pub id: i64,
    pub keyword: String,
    pub keyword_norm: String,
    pub title: String,
    pub url: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub published_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewKeywordArticle {
    pub keyword: String,
    pub keyword_norm: String,
    pub title: String,
    pub url: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub published_at: Option<String>,
}

impl NewsDb {
    /// Insert a keyword article; the first writer for a URL wins.
    ///
    /// Returns the row id and `true` when this call created the row.
    pub async fn insert_keyword_article_row(&self, article: &NewKeywordArticle) -> Result<(i64, bool), Error> {
        let article = article.clone();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(i64, bool), Error> {
                let changed = conn.execute(
                    "INSERT INTO keyword_articles
                        (keyword, keyword_norm, title, url, summary, image_url, published_at, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(url) DO NOTHING",
                    params![
                        &article.keyword,
                        &article.keyword_norm,
                        &article.title,
                        &article.url,
                        &article.summary,
                        &article.image_url,
                        &article.published_at,
                        now,
                    ],
                )?;
                if changed == 1 {
                    return Ok((conn.last_insert_rowid(), true));
                }
                let id: i64 = conn.query_row(
                    "SELECT id FROM keyword_articles WHERE url = ?1",
                    params![article.url],
                    |row| row.get(0),
                )?;
                Ok((id, false))
            })
            .await
            .map_err(Error::from)
    }

    pub async fn keyword_article_exists(&self, url: &str) -> Result<bool, Error> {
        let url = url.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM keyword_articles WHERE url = ?1)",
                    params![url],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await
            .map_err(Error::from)
    }

    /// Articles grouped under `keyword_norm`, newest first.
    pub async fn list_keyword_articles(&self, keyword_norm: &str, limit: usize) -> Result<Vec<KeywordArticle>, Error> {
        let keyword_norm = keyword_norm.to_string();
        let limit = limit as i64;
        self.conn
            .call(move |conn| -> Result<Vec<KeywordArticle>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT id, keyword, keyword_norm, title, url, summary, image_url, published_at, created_at
                     FROM keyword_articles WHERE keyword_norm = ?1
                     ORDER BY id DESC LIMIT ?2",
                )?;
                let rows = stmt
                    .query_map(params![keyword_norm, limit], |row: &rusqlite::Row<'_>| {
                        Ok(KeywordArticle {
                            id: row.get(0)?,
                            keyword: row.get(1)?,
                            keyword_norm: row.get(2)?,
                            title: row.get(3)?,
                            url: row.get(4)?,
                            summary: row.get(5)?,
                            image_url: row.get(6)?,
                            published_at: row.get(7)?,
                            created_at: row.get(8)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(Error::from)
    }
}
