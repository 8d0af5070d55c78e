//! SQLite persistence for wash jobs, wash history and master data.
//!
//! One connection per process, shared behind a mutex. Each table has its
//! own `*_repo` module with plain functions taking a `&Connection`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;

pub mod employee_repo;
pub mod error;
pub mod history_repo;
pub mod migrations;
pub mod sequence_repo;
pub mod uniform_repo;
pub mod wash_job_repo;

pub use error::DatabaseError;

/// Shared handle to the uniwash database. Clones share one connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens the database file, creating parent directories, and brings
    /// the schema up to date.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Self::from_migrated(conn, Some(path))
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Self::from_migrated(conn, None)
    }

    fn from_migrated(conn: Connection, path: Option<&Path>) -> Result<Self, DatabaseError> {
        migrations::run_all(&conn)?;
        match path {
            Some(path) => log::info!("Wash database ready at {}", path.display()),
            None => log::debug!("In-memory wash database ready"),
        }
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` while holding the connection lock.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> Result<T, DatabaseError>,
    {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        f(&conn)
    }
}

/// `~/.uniwash/data/uniwash.db`
pub fn default_database_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".uniwash").join("data").join("uniwash.db"))
}

/// Formats a timestamp the way every table stores it (RFC 3339, UTC, millis).
pub(crate) fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(
    s: &str,
    table: &'static str,
) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::InvalidRow {
            table,
            reason: format!("bad timestamp '{}': {}", s, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn count(db: &Database, table: &str) -> u32 {
        db.with_conn(|conn| {
            Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?)
        })
        .unwrap()
    }

    #[test]
    fn test_fresh_schema_has_empty_tables() {
        let db = Database::open_in_memory().unwrap();
        for table in ["wash_jobs", "wash_history", "uniforms", "employees"] {
            assert_eq!(count(&db, table), 0, "{}", table);
        }
    }

    #[test]
    fn test_jobs_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("uniwash.db");

        let db = Database::open(&path).unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO wash_jobs (id, wash_id, uniform_code, color, created_at, updated_at)
                 VALUES ('WASH-000001', 'WASH-000001', 'U001', 'Blue', '2026-03-01', '2026-03-01')",
                [],
            )?;
            Ok(())
        })
        .unwrap();
        drop(db);

        let reopened = Database::open(&path).unwrap();
        assert_eq!(count(&reopened, "wash_jobs"), 1);
    }

    #[test]
    fn test_default_database_path_under_home() {
        let path = default_database_path().unwrap();
        assert!(path.ends_with(".uniwash/data/uniwash.db"));
    }

    #[test]
    fn test_clones_share_connection() {
        let db = Database::open_in_memory().unwrap();
        let other = db.clone();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO employees (emp_id, emp_name) VALUES ('E01', 'Somchai')",
                [],
            )?;
            Ok(())
        })
        .unwrap();
        assert_eq!(count(&other, "employees"), 1);
    }

    #[test]
    fn test_timestamps_sort_lexically() {
        let early = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let late = Utc.with_ymd_and_hms(2026, 11, 2, 3, 4, 5).unwrap();
        let (a, b) = (format_timestamp(early), format_timestamp(late));
        assert!(a < b);
        assert_eq!(a, "2026-01-02T03:04:05.000Z");
        assert_eq!(parse_timestamp(&a, "t").unwrap(), early);
        assert!(parse_timestamp("yesterday", "t").is_err());
    }
}
