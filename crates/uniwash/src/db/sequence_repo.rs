//! Named monotonic counters.

use rusqlite::params;

use super::{Database, DatabaseError};

/// Increments the named counter and returns its new value. The first call
/// for a name returns 1.
pub fn next_value(db: &Database, name: &str) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO sequences (name, value) VALUES (?1, 1)
             ON CONFLICT (name) DO UPDATE SET value = value + 1",
            params![name],
        )?;
        let value: i64 = conn.query_row(
            "SELECT value FROM sequences WHERE name = ?1",
            params![name],
            |r| r.get(0),
        )?;
        Ok(value)
    })
}
