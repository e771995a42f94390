use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use crate::error::{AppError, Result};
use crate::models::{Category, NewNewsItem, NewsItem};

use super::query::{news_from_row, NewsQuery};
use super::{format_timestamp, open_connection};

/// Read/write access to categories and news.
///
/// Holds only the store location. Each operation opens its own connection
/// and releases it before returning, so a `Repository` can be shared freely
/// between concurrent callers.
#[derive(Debug, Clone)]
pub struct Repository {
    db_path: PathBuf,
}

impl Repository {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn open(&self) -> Result<Connection> {
        open_connection(&self.db_path).await
    }

    // Category operations

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.open().await?;
        let categories = conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT id, name, slug FROM categories ORDER BY name")?;
                let categories = stmt
                    .query_map([], category_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(categories)
            })
            .await?;
        Ok(categories)
    }

    pub async fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let slug = slug.to_string();
        let conn = self.open().await?;
        let category = conn
            .call(move |conn| {
                let category = conn
                    .query_row(
                        "SELECT id, name, slug FROM categories WHERE slug = ?1 LIMIT 1",
                        params![slug],
                        category_from_row,
                    )
                    .optional()?;
                Ok(category)
            })
            .await?;
        Ok(category)
    }

    /// Fails with [`AppError::ForeignKey`] while any news item still
    /// references the category.
    pub async fn delete_category(&self, id: i64) -> Result<bool> {
        let conn = self.open().await?;
        let deleted = conn
            .call(move |conn| {
                let rows = conn.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
                Ok(rows > 0)
            })
            .await?;
        Ok(deleted)
    }

    // News read operations

    pub async fn list_latest(&self, limit: usize) -> Result<Vec<NewsItem>> {
        self.query_news(NewsQuery::latest(limit)).await
    }

    pub async fn list_featured(&self, limit: usize) -> Result<Vec<NewsItem>> {
        self.query_news(NewsQuery::featured(limit)).await
    }

    pub async fn list_by_category_slug(&self, slug: &str, limit: usize) -> Result<Vec<NewsItem>> {
        self.query_news(NewsQuery::by_category_slug(slug, limit)).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<NewsItem>> {
        let items = self.query_news(NewsQuery::by_id(id)).await?;
        Ok(items.into_iter().next())
    }

    /// Runs any [`NewsQuery`] against the shared projection.
    pub async fn query_news(&self, query: NewsQuery) -> Result<Vec<NewsItem>> {
        if query.limit == Some(0) {
            return Err(AppError::InvalidInput(
                "limit must be a positive integer".to_string(),
            ));
        }

        let (sql, values) = query.to_sql();
        let conn = self.open().await?;
        let items = conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let items = stmt
                    .query_map(params_from_iter(values.iter()), news_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(items)
            })
            .await?;
        Ok(items)
    }

    // News write operations

    /// Inserts a news item and returns its id. An unknown `category_id` is
    /// reported as [`AppError::ForeignKey`].
    pub async fn create(&self, item: NewNewsItem) -> Result<i64> {
        let accent_color = item.accent_color_or_default().to_string();
        let published_at = format_timestamp(&item.published_at_or(Utc::now()));

        let conn = self.open().await?;
        let id = conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO news (category_id, title, summary, content, accent_color, published_at, is_featured)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
                    params![
                        item.category_id,
                        item.title,
                        item.summary,
                        item.content,
                        accent_color,
                        published_at,
                        item.is_featured,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }

    /// Overwrites every writable field of item `id`, with the same defaults
    /// as [`create`](Self::create). Returns `false` when no such item exists;
    /// that case is not an error.
    pub async fn update(&self, id: i64, item: NewNewsItem) -> Result<bool> {
        let accent_color = item.accent_color_or_default().to_string();
        let published_at = format_timestamp(&item.published_at_or(Utc::now()));

        let conn = self.open().await?;
        let updated = conn
            .call(move |conn| {
                let rows = conn.execute(
                    r#"UPDATE news
                       SET category_id = ?1,
                           title = ?2,
                           summary = ?3,
                           content = ?4,
                           accent_color = ?5,
                           published_at = ?6,
                           is_featured = ?7
                       WHERE id = ?8"#,
                    params![
                        item.category_id,
                        item.title,
                        item.summary,
                        item.content,
                        accent_color,
                        published_at,
                        item.is_featured,
                        id,
                    ],
                )?;
                Ok(rows > 0)
            })
            .await?;
        Ok(updated)
    }

    /// Returns `false` when no such item exists.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.open().await?;
        let deleted = conn
            .call(move |conn| {
                let rows = conn.execute("DELETE FROM news WHERE id = ?1", params![id])?;
                Ok(rows > 0)
            })
            .await?;
        Ok(deleted)
    }
}

fn category_from_row(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
    })
}
