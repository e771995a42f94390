//! The single read path for news items.
//!
//! Every news listing and lookup goes through [`NewsQuery`], which renders the
//! shared `news ⋈ categories` projection plus one predicate, the shared
//! ordering and an optional limit. Rows are decoded by [`news_from_row`] only.

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::Row;

use crate::models::NewsItem;

use super::parse_datetime;

const NEWS_SELECT: &str = r#"SELECT n.id, n.category_id, c.name, c.slug, n.title, n.summary,
       n.content, n.accent_color, n.published_at, n.is_featured
FROM news n
JOIN categories c ON c.id = n.category_id"#;

// julianday() compares offset and SQLite-style values by instant but only to
// the millisecond; the canonical text then orders within a millisecond and id
// breaks exact ties. Undecodable values sort last.
const NEWS_ORDER: &str =
    "ORDER BY julianday(n.published_at) DESC, n.published_at DESC, n.id DESC";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsFilter {
    All,
    Featured,
    CategorySlug(String),
    Id(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub filter: NewsFilter,
    pub limit: Option<usize>,
}

impl NewsQuery {
    pub fn latest(limit: usize) -> Self {
        Self {
            filter: NewsFilter::All,
            limit: Some(limit),
        }
    }

    pub fn featured(limit: usize) -> Self {
        Self {
            filter: NewsFilter::Featured,
            limit: Some(limit),
        }
    }

    pub fn by_category_slug(slug: impl Into<String>, limit: usize) -> Self {
        Self {
            filter: NewsFilter::CategorySlug(slug.into()),
            limit: Some(limit),
        }
    }

    pub fn by_id(id: i64) -> Self {
        Self {
            filter: NewsFilter::Id(id),
            limit: Some(1),
        }
    }

    /// Renders the statement and its positional parameters. User-supplied
    /// values only ever travel as parameters.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut params = Vec::new();

        let predicate = match &self.filter {
            NewsFilter::All => None,
            NewsFilter::Featured => Some("n.is_featured = 1".to_string()),
            NewsFilter::CategorySlug(slug) => {
                params.push(Value::Text(slug.clone()));
                Some(format!("c.slug = ?{}", params.len()))
            }
            NewsFilter::Id(id) => {
                params.push(Value::Integer(*id));
                Some(format!("n.id = ?{}", params.len()))
            }
        };

        let mut sql = String::from(NEWS_SELECT);
        if let Some(predicate) = predicate {
            sql.push_str("\nWHERE ");
            sql.push_str(&predicate);
        }
        sql.push('\n');
        sql.push_str(NEWS_ORDER);

        if let Some(limit) = self.limit {
            params.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
            sql.push_str(&format!("\nLIMIT ?{}", params.len()));
        }

        (sql, params)
    }
}

/// Maps one row of the shared projection. A `published_at` that cannot be
/// decoded becomes the current time instead of failing the whole read.
pub(crate) fn news_from_row(row: &Row) -> rusqlite::Result<NewsItem> {
    Ok(NewsItem {
        id: row.get(0)?,
        category_id: row.get(1)?,
        category_name: row.get(2)?,
        category_slug: row.get(3)?,
        title: row.get(4)?,
        summary: row.get(5)?,
        content: row.get(6)?,
        accent_color: row.get(7)?,
        published_at: row
            .get::<_, String>(8)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
        is_featured: row.get::<_, i64>(9)? != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_has_no_predicate() {
        let (sql, params) = NewsQuery::latest(5).to_sql();
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with(&format!("{}\nLIMIT ?1", NEWS_ORDER)));
        assert_eq!(params, vec![Value::Integer(5)]);
    }

    #[test]
    fn featured_filters_on_flag_only() {
        let (sql, params) = NewsQuery::featured(3).to_sql();
        assert!(sql.contains("WHERE n.is_featured = 1"));
        assert_eq!(params, vec![Value::Integer(3)]);
    }

    #[test]
    fn slug_is_bound_not_inlined() {
        let hostile = "tech' OR '1'='1";
        let (sql, params) = NewsQuery::by_category_slug(hostile, 10).to_sql();
        assert!(!sql.contains(hostile));
        assert!(sql.contains("WHERE c.slug = ?1"));
        assert!(sql.ends_with("LIMIT ?2"));
        assert_eq!(
            params,
            vec![Value::Text(hostile.to_string()), Value::Integer(10)]
        );
    }

    #[test]
    fn by_id_limits_to_one_row() {
        let (sql, params) = NewsQuery::by_id(42).to_sql();
        assert!(sql.contains("WHERE n.id = ?1"));
        assert_eq!(params, vec![Value::Integer(42), Value::Integer(1)]);
    }

    #[test]
    fn unlimited_query_has_no_limit_clause() {
        let query = NewsQuery {
            filter: NewsFilter::All,
            limit: None,
        };
        let (sql, params) = query.to_sql();
        assert!(!sql.contains("LIMIT"));
        assert!(params.is_empty());
    }
}
