//! Content repository for a category-based news portal.
//!
//! [`DbInitializer`] prepares the SQLite store once at startup and
//! [`Repository`] serves every read and write afterwards.

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use config::Config;
pub use db::{DbInitializer, InitOutcome, NewsFilter, NewsQuery, Repository};
pub use error::{AppError, Result};
pub use models::{Category, NewNewsItem, NewsItem};
