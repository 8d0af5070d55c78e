//! Wash history repository. The table is append-only: rows are inserted and
//! read, never updated or deleted (triggers reject both).

use rusqlite::{params, Row};

use super::{format_timestamp, parse_timestamp, Database, DatabaseError};
use crate::model::{TestResult, WashHistoryEntry};
use crate::status::WashPhase;

const TABLE: &str = "wash_history";

/// A raw history row from the database.
#[derive(Debug, Clone)]
pub struct HistoryRow {
    pub id: String,
    pub wash_id: String,
    pub uniform_code: String,
    pub color: String,
    pub size: String,
    pub emp_id: String,
    pub emp_name: String,
    pub status: String,
    pub rewash_count: i64,
    pub test_result: Option<String>,
    pub test_date: Option<String>,
    pub note: Option<String>,
    pub created_at: String,
    pub recorded_at: String,
}

impl HistoryRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            wash_id: row.get("wash_id")?,
            uniform_code: row.get("uniform_code")?,
            color: row.get("color")?,
            size: row.get("size")?,
            emp_id: row.get("emp_id")?,
            emp_name: row.get("emp_name")?,
            status: row.get("status")?,
            rewash_count: row.get("rewash_count")?,
            test_result: row.get("test_result")?,
            test_date: row.get("test_date")?,
            note: row.get("note")?,
            created_at: row.get("created_at")?,
            recorded_at: row.get("recorded_at")?,
        })
    }

    pub fn from_entry(entry: &WashHistoryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            wash_id: entry.wash_id.clone(),
            uniform_code: entry.uniform_code.clone(),
            color: entry.color.clone(),
            size: entry.size.clone(),
            emp_id: entry.emp_id.clone(),
            emp_name: entry.emp_name.clone(),
            status: entry.status.as_key().to_string(),
            rewash_count: i64::from(entry.rewash_count),
            test_result: entry.test_result.map(|r| r.as_str().to_string()),
            test_date: entry.test_date.map(format_timestamp),
            note: entry.note.clone(),
            created_at: format_timestamp(entry.created_at),
            recorded_at: format_timestamp(entry.recorded_at),
        }
    }

    pub fn to_entry(&self) -> Result<WashHistoryEntry, DatabaseError> {
        let rewash_count = u32::try_from(self.rewash_count).map_err(|_| DatabaseError::InvalidRow {
            table: TABLE,
            reason: format!("negative rewash_count for {}", self.wash_id),
        })?;
        let test_result = match self.test_result.as_deref() {
            None => None,
            Some(raw) => Some(TestResult::parse(raw).ok_or_else(|| DatabaseError::InvalidRow {
                table: TABLE,
                reason: format!("unknown test result '{}'", raw),
            })?),
        };
        let test_date = match self.test_date.as_deref() {
            None => None,
            Some(raw) => Some(parse_timestamp(raw, TABLE)?),
        };

        Ok(WashHistoryEntry {
            id: self.id.clone(),
            wash_id: self.wash_id.clone(),
            uniform_code: self.uniform_code.clone(),
            color: self.color.clone(),
            size: self.size.clone(),
            emp_id: self.emp_id.clone(),
            emp_name: self.emp_name.clone(),
            status: WashPhase::from_key(&self.status, &self.wash_id),
            rewash_count,
            test_result,
            test_date,
            note: self.note.clone(),
            created_at: parse_timestamp(&self.created_at, TABLE)?,
            recorded_at: parse_timestamp(&self.recorded_at, TABLE)?,
        })
    }
}

/// Appends a history row.
pub fn insert(db: &Database, entry: &HistoryRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO wash_history (id, wash_id, uniform_code, color, size, emp_id, emp_name,
             status, rewash_count, test_result, test_date, note, created_at, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                entry.id,
                entry.wash_id,
                entry.uniform_code,
                entry.color,
                entry.size,
                entry.emp_id,
                entry.emp_name,
                entry.status,
                entry.rewash_count,
                entry.test_result,
                entry.test_date,
                entry.note,
                entry.created_at,
                entry.recorded_at,
            ],
        )?;
        Ok(())
    })
}

/// Returns every history row in insertion order.
pub fn list_all(db: &Database) -> Result<Vec<HistoryRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM wash_history ORDER BY rowid ASC")?;
        let rows = stmt
            .query_map([], HistoryRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn count(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM wash_history", [], |r| r.get(0))?;
        Ok(count)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_entry(wash_id: &str, status: WashPhase) -> WashHistoryEntry {
        let at = Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap();
        WashHistoryEntry {
            id: format!("h-{}", wash_id),
            wash_id: wash_id.to_string(),
            uniform_code: "U001".to_string(),
            color: "Blue".to_string(),
            size: "M".to_string(),
            emp_id: "E01".to_string(),
            emp_name: "Somchai".to_string(),
            status,
            rewash_count: 1,
            test_result: Some(TestResult::Pass),
            test_date: Some(at),
            note: None,
            created_at: at,
            recorded_at: at,
        }
    }

    #[test]
    fn test_insert_and_list() {
        let db = Database::open_in_memory().unwrap();
        let first = sample_entry("WASH-000002", WashPhase::EsdPassed);
        let mut second = sample_entry("WASH-000001", WashPhase::Scrap);
        second.test_result = None;
        second.test_date = None;
        second.note = Some("Discarded".to_string());

        insert(&db, &HistoryRow::from_entry(&first)).unwrap();
        insert(&db, &HistoryRow::from_entry(&second)).unwrap();

        let rows = list_all(&db).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].to_entry().unwrap(), first);
        assert_eq!(rows[1].to_entry().unwrap(), second);
        assert_eq!(count(&db).unwrap(), 2);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let db = Database::open_in_memory().unwrap();
        let entry = sample_entry("WASH-000001", WashPhase::EsdPassed);
        insert(&db, &HistoryRow::from_entry(&entry)).unwrap();
        assert!(insert(&db, &HistoryRow::from_entry(&entry)).is_err());
    }

    #[test]
    fn test_unknown_test_result_is_invalid() {
        let mut row = HistoryRow::from_entry(&sample_entry("WASH-000001", WashPhase::EsdFailed));
        row.test_result = Some("MAYBE".to_string());
        assert!(row.to_entry().is_err());
    }
}
