mod initializer;
mod query;
mod repository;
mod schema;
mod seed;

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use tokio_rusqlite::Connection;

use crate::error::Result;

pub use initializer::{DbInitializer, InitOutcome};
pub use query::{NewsFilter, NewsQuery};
pub use repository::Repository;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a store connection with foreign keys enforced.
pub(crate) async fn open_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).await?;

    conn.call(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(())
    })
    .await?;

    Ok(conn)
}

/// Fixed-width UTC form, so stored values sort lexically in time order.
pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56.000000000Z")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}
