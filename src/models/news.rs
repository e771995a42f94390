use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Banner color used when an item has none.
pub const DEFAULT_ACCENT_COLOR: &str = "#2D6CDF";

pub const TITLE_MAX_LEN: usize = 120;
pub const SUMMARY_MAX_LEN: usize = 240;
pub const ACCENT_COLOR_MAX_LEN: usize = 16;

/// A news item as read back from the store, joined with its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub category_slug: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub accent_color: String,
    pub published_at: DateTime<Utc>,
    pub is_featured: bool,
}

/// Writable fields of a news item, used by both create and update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewNewsItem {
    pub category_id: i64,
    pub title: String,
    pub summary: String,
    pub content: String,
    /// `None` or blank falls back to [`DEFAULT_ACCENT_COLOR`].
    pub accent_color: Option<String>,
    /// `None` means "now" at write time.
    pub published_at: Option<DateTime<Utc>>,
    pub is_featured: bool,
}

impl NewNewsItem {
    pub fn accent_color_or_default(&self) -> &str {
        match self.accent_color.as_deref() {
            Some(color) if !color.trim().is_empty() => color,
            _ => DEFAULT_ACCENT_COLOR,
        }
    }

    pub fn published_at_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.published_at.unwrap_or(now)
    }

    /// Form-level checks for callers that accept user input. The repository
    /// itself only enforces what the store enforces.
    pub fn validate(&self) -> Result<()> {
        check_text("title", &self.title, Some(TITLE_MAX_LEN))?;
        check_text("summary", &self.summary, Some(SUMMARY_MAX_LEN))?;
        check_text("content", &self.content, None)?;

        if let Some(color) = &self.accent_color {
            if color.chars().count() > ACCENT_COLOR_MAX_LEN {
                return Err(AppError::Validation {
                    field: "accent_color",
                    reason: format!("must be at most {} characters", ACCENT_COLOR_MAX_LEN),
                });
            }
        }

        Ok(())
    }
}

impl From<NewsItem> for NewNewsItem {
    fn from(item: NewsItem) -> Self {
        Self {
            category_id: item.category_id,
            title: item.title,
            summary: item.summary,
            content: item.content,
            accent_color: Some(item.accent_color),
            published_at: Some(item.published_at),
            is_featured: item.is_featured,
        }
    }
}

fn check_text(field: &'static str, value: &str, max_len: Option<usize>) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    if let Some(max) = max_len {
        if value.chars().count() > max {
            return Err(AppError::Validation {
                field,
                reason: format!("must be at most {} characters", max),
            });
        }
    }
    Ok(())
}
