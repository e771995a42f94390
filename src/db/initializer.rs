use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::Result;

use super::schema::SCHEMA;
use super::seed::{seed_published_at, SeedCategory, SeedNews, SEED_CATEGORIES, SEED_NEWS};
use super::{format_timestamp, open_connection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Seeded { categories: usize, news: usize },
    AlreadySeeded,
}

/// Creates the schema and, on an empty store, the seed data.
pub struct DbInitializer {
    db_path: PathBuf,
}

impl DbInitializer {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub async fn initialize(&self) -> Result<InitOutcome> {
        self.initialize_at(Utc::now()).await
    }

    /// Like [`initialize`](Self::initialize), with seed dates counted back
    /// from `now`.
    pub async fn initialize_at(&self, now: DateTime<Utc>) -> Result<InitOutcome> {
        if let Some(dir) = self.db_path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }

        let conn = open_connection(&self.db_path).await?;

        let outcome = conn
            .call(move |conn| {
                conn.execute_batch(SCHEMA)?;

                let category_count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
                if category_count > 0 {
                    return Ok(None);
                }

                let counts = seed_store(conn, SEED_CATEGORIES, SEED_NEWS, now)?;
                Ok(Some(counts))
            })
            .await?;

        match outcome {
            Some((categories, news)) => {
                tracing::info!(
                    "Seeded {} categories and {} news items into {}",
                    categories,
                    news,
                    self.db_path.display()
                );
                Ok(InitOutcome::Seeded { categories, news })
            }
            None => {
                tracing::debug!("Store at {} already seeded", self.db_path.display());
                Ok(InitOutcome::AlreadySeeded)
            }
        }
    }
}

/// Inserts `categories` and `news` in one transaction. Any failure, including
/// a news row naming an unknown category, rolls the whole seed back.
fn seed_store(
    conn: &mut Connection,
    categories: &[SeedCategory],
    news: &[SeedNews],
    now: DateTime<Utc>,
) -> tokio_rusqlite::Result<(usize, usize)> {
    let tx = conn.transaction()?;

    let mut category_ids = HashMap::new();
    for category in categories {
        tx.execute(
            "INSERT INTO categories (name, slug) VALUES (?1, ?2)",
            params![category.name, category.slug],
        )?;
        category_ids.insert(category.slug, tx.last_insert_rowid());
    }

    for item in news {
        let category_id = category_ids.get(item.category_slug).ok_or_else(|| {
            tokio_rusqlite::Error::Other(
                format!(
                    "seed item '{}' references unknown category '{}'",
                    item.title, item.category_slug
                )
                .into(),
            )
        })?;
        tx.execute(
            r#"INSERT INTO news (category_id, title, summary, content, accent_color, published_at, is_featured)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
            params![
                category_id,
                item.title,
                item.summary,
                item.content,
                item.accent_color,
                format_timestamp(&seed_published_at(item.title, now)),
                item.is_featured,
            ],
        )?;
    }

    tx.commit()?;
    Ok((category_ids.len(), news.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use chrono::TimeZone;
    use std::path::Path;
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    async fn count(path: &Path, table: &'static str) -> i64 {
        let conn = open_connection(path).await.unwrap();
        conn.call(move |conn| {
            let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
            Ok(n)
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn creates_missing_directories_and_seeds() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("App_Data").join("nested").join("news.db");

        let outcome = assert_ok!(DbInitializer::new(&path).initialize().await);

        assert!(path.exists());
        assert_eq!(
            outcome,
            InitOutcome::Seeded {
                categories: 4,
                news: 12
            }
        );
        assert_eq!(count(&path, "categories").await, 4);
        assert_eq!(count(&path, "news").await, 12);
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("news.db");
        let init = DbInitializer::new(&path);

        assert_ok!(init.initialize().await);
        let outcome = assert_ok!(init.initialize().await);

        assert_eq!(outcome, InitOutcome::AlreadySeeded);
        assert_eq!(count(&path, "categories").await, 4);
        assert_eq!(count(&path, "news").await, 12);
    }

    #[tokio::test]
    async fn seed_dates_follow_base_time() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("news.db");
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();

        assert_ok!(DbInitializer::new(&path).initialize_at(now).await);

        let conn = open_connection(&path).await.unwrap();
        let stored: Vec<(String, String)> = conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT title, published_at FROM news")?;
                let rows = stmt
                    .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .unwrap();

        assert_eq!(stored.len(), SEED_NEWS.len());
        for (title, published_at) in stored {
            assert_eq!(
                published_at,
                format_timestamp(&seed_published_at(&title, now))
            );
        }
    }

    #[tokio::test]
    async fn existing_category_blocks_seeding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("news.db");

        let conn = open_connection(&path).await.unwrap();
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            conn.execute(
                "INSERT INTO categories (name, slug) VALUES ('Local', 'local')",
                [],
            )?;
            Ok(())
        })
        .await
        .unwrap();

        let outcome = assert_ok!(DbInitializer::new(&path).initialize().await);
        assert_eq!(outcome, InitOutcome::AlreadySeeded);
        assert_eq!(count(&path, "categories").await, 1);
        assert_eq!(count(&path, "news").await, 0);
    }

    #[tokio::test]
    async fn failed_seed_leaves_store_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("news.db");

        // Abort part-way through, after every category and most news rows.
        let conn = open_connection(&path).await.unwrap();
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            conn.execute_batch(
                r#"CREATE TRIGGER interrupt_seed BEFORE INSERT ON news
                   WHEN NEW.title = 'Theatre premiere'
                   BEGIN SELECT RAISE(ABORT, 'seed interrupted'); END;"#,
            )?;
            Ok(())
        })
        .await
        .unwrap();

        let result = DbInitializer::new(&path).initialize().await;
        assert!(matches!(result, Err(AppError::Sqlite(_))), "{:?}", result);
        assert_eq!(count(&path, "categories").await, 0);
        assert_eq!(count(&path, "news").await, 0);

        // Nothing was committed, so the next start seeds from scratch.
        conn.call(|conn| {
            conn.execute_batch("DROP TRIGGER interrupt_seed;")?;
            Ok(())
        })
        .await
        .unwrap();

        let outcome = assert_ok!(DbInitializer::new(&path).initialize().await);
        assert_eq!(
            outcome,
            InitOutcome::Seeded {
                categories: 4,
                news: 12
            }
        );
    }

    #[test]
    fn unknown_seed_category_rolls_back() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let categories = [SeedCategory {
            name: "Technology",
            slug: "tech",
        }];
        let news = [
            SeedNews {
                category_slug: "tech",
                title: "Quantum computers",
                summary: "Summary",
                content: "Content",
                accent_color: "#334155",
                is_featured: false,
            },
            SeedNews {
                category_slug: "weather",
                title: "Storm warning",
                summary: "Summary",
                content: "Content",
                accent_color: "#334155",
                is_featured: true,
            },
        ];

        let err = seed_store(&mut conn, &categories, &news, Utc::now()).unwrap_err();
        let err: AppError = err.into();
        assert!(matches!(err, AppError::Database(_)), "{:?}", err);
        assert!(err.to_string().contains("weather"));

        for table in ["categories", "news"] {
            let n: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })
                .unwrap();
            assert_eq!(n, 0, "{} should be empty", table);
        }
    }

    #[tokio::test]
    async fn unusable_location_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A regular file where the parent directory should be.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = DbInitializer::new(blocker.join("news.db")).initialize().await;
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
