use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(tokio_rusqlite::Error),

    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    /// A write referenced a missing category, or a delete would orphan news.
    #[error("Referential integrity violation: {0}")]
    ForeignKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn is_foreign_key(&self) -> bool {
        matches!(self, AppError::ForeignKey(_))
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        if is_foreign_key_violation(&err) {
            AppError::ForeignKey(err.to_string())
        } else {
            AppError::Sqlite(err)
        }
    }
}

impl From<tokio_rusqlite::Error> for AppError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        match err {
            tokio_rusqlite::Error::Rusqlite(e) => e.into(),
            other => AppError::Database(other),
        }
    }
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

pub type Result<T> = std::result::Result<T, AppError>;
