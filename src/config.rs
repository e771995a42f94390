use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Overrides `database_file` when set.
pub const DATABASE_FILE_ENV: &str = "NEWS_PORTAL_DATABASE_FILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Store location, relative to `content_root` unless absolute.
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Base directory for relative paths; the working directory when unset.
    #[serde(default)]
    pub content_root: Option<PathBuf>,
}

fn default_database_file() -> String {
    "App_Data/news.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            content_root: None,
        }
    }
}

impl Config {
    /// Reads the user config file if there is one, then applies the
    /// environment override.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let config = if config_path.exists() {
            Self::read(&config_path)?
        } else {
            Config::default()
        };
        Ok(config.with_env_override(std::env::var(DATABASE_FILE_ENV).ok()))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Self::read(path)?;
        Ok(config.with_env_override(std::env::var(DATABASE_FILE_ENV).ok()))
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        if config.database_file.trim().is_empty() {
            return Err(AppError::Config("database_file must not be empty".to_string()));
        }
        Ok(config)
    }

    fn with_env_override(mut self, database_file: Option<String>) -> Self {
        if let Some(file) = database_file.filter(|f| !f.trim().is_empty()) {
            self.database_file = file;
        }
        self
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("news-portal")
            .join("config.toml")
    }

    /// Resolves the store location against the content root.
    pub fn db_path(&self) -> PathBuf {
        let file = Path::new(&self.database_file);
        if file.is_absolute() {
            return file.to_path_buf();
        }
        // forward slashes are accepted on every platform
        let relative: PathBuf = self
            .database_file
            .split('/')
            .filter(|part| !part.is_empty())
            .collect();

        let root = self
            .content_root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        root.join(relative)
    }
}
