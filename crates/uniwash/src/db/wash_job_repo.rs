//! Wash job repository - CRUD operations for the `wash_jobs` table.

use rusqlite::{params, Row};

use super::{format_timestamp, parse_timestamp, Database, DatabaseError};
use crate::model::WashJob;
use crate::status::WashPhase;

const TABLE: &str = "wash_jobs";

/// A raw wash job row from the database.
#[derive(Debug, Clone)]
pub struct WashJobRow {
    pub id: String,
    pub wash_id: String,
    pub uniform_code: String,
    pub color: String,
    pub size: String,
    pub emp_id: String,
    pub emp_name: String,
    pub status: String,
    pub rewash_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl WashJobRow {
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
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Builds a row for `job`, stamped with `updated_at`.
    pub fn from_job(job: &WashJob, updated_at: &str) -> Self {
        Self {
            id: job.id.clone(),
            wash_id: job.wash_id.clone(),
            uniform_code: job.uniform_code.clone(),
            color: job.color.clone(),
            size: job.size.clone(),
            emp_id: job.emp_id.clone(),
            emp_name: job.emp_name.clone(),
            status: job.status.as_key().to_string(),
            rewash_count: i64::from(job.rewash_count),
            created_at: format_timestamp(job.created_at),
            updated_at: updated_at.to_string(),
        }
    }

    pub fn to_job(&self) -> Result<WashJob, DatabaseError> {
        let rewash_count = u32::try_from(self.rewash_count).map_err(|_| DatabaseError::InvalidRow {
            table: TABLE,
            reason: format!("negative rewash_count for {}", self.wash_id),
        })?;

        Ok(WashJob {
            id: self.id.clone(),
            wash_id: self.wash_id.clone(),
            uniform_code: self.uniform_code.clone(),
            color: self.color.clone(),
            size: self.size.clone(),
            emp_id: self.emp_id.clone(),
            emp_name: self.emp_name.clone(),
            status: WashPhase::from_key(&self.status, &self.wash_id),
            rewash_count,
            created_at: parse_timestamp(&self.created_at, TABLE)?,
        })
    }
}

/// Query filter parameters for wash job listing.
#[derive(Debug, Default, Clone)]
pub struct WashJobFilter {
    pub uniform_code: Option<String>,
    pub color: Option<String>,
    pub wash_id: Option<String>,
}

/// Inserts a new wash job row.
pub fn insert(db: &Database, job: &WashJobRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO wash_jobs (id, wash_id, uniform_code, color, size, emp_id, emp_name,
             status, rewash_count, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                job.id,
                job.wash_id,
                job.uniform_code,
                job.color,
                job.size,
                job.emp_id,
                job.emp_name,
                job.status,
                job.rewash_count,
                job.created_at,
                job.updated_at,
            ],
        )?;
        Ok(())
    })
}

/// Finds a wash job by its store id.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<WashJobRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM wash_jobs WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], WashJobRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Queries wash jobs matching every set filter field, oldest first.
pub fn query(db: &Database, filter: &WashJobFilter) -> Result<Vec<WashJobRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut conditions = Vec::new();
        let mut param_values: Vec<&dyn rusqlite::types::ToSql> = Vec::new();

        if let Some(ref uniform_code) = filter.uniform_code {
            param_values.push(uniform_code);
            conditions.push(format!("uniform_code = ?{}", param_values.len()));
        }
        if let Some(ref color) = filter.color {
            param_values.push(color);
            conditions.push(format!("color = ?{}", param_values.len()));
        }
        if let Some(ref wash_id) = filter.wash_id {
            param_values.push(wash_id);
            conditions.push(format!("wash_id = ?{}", param_values.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT * FROM wash_jobs {} ORDER BY created_at ASC, wash_id ASC",
            where_clause
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(param_values.as_slice(), WashJobRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Updates the status and/or start of cycle of a job. Returns the number of
/// rows touched (0 when the id is unknown).
pub fn update_fields(
    db: &Database,
    id: &str,
    status: Option<&str>,
    created_at: Option<&str>,
    updated_at: &str,
) -> Result<usize, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE wash_jobs SET status = COALESCE(?2, status),
             created_at = COALESCE(?3, created_at), updated_at = ?4
             WHERE id = ?1",
            params![id, status, created_at, updated_at],
        )?;
        Ok(changed)
    })
}

/// Deletes a job. Returns the number of rows removed.
pub fn delete(db: &Database, id: &str) -> Result<usize, DatabaseError> {
    db.with_conn(|conn| {
        let removed = conn.execute("DELETE FROM wash_jobs WHERE id = ?1", params![id])?;
        Ok(removed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    fn sample_job(id: &str, code: &str, color: &str) -> WashJobRow {
        WashJobRow {
            id: id.to_string(),
            wash_id: id.to_string(),
            uniform_code: code.to_string(),
            color: color.to_string(),
            size: "M".to_string(),
            emp_id: "-".to_string(),
            emp_name: "-".to_string(),
            status: "waiting_to_send".to_string(),
            rewash_count: 0,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_insert_and_find() {
        let db = test_db();
        insert(&db, &sample_job("WASH-000001", "U001", "Blue")).unwrap();

        let found = find_by_id(&db, "WASH-000001").unwrap().unwrap();
        assert_eq!(found.uniform_code, "U001");
        let job = found.to_job().unwrap();
        assert_eq!(job.status, WashPhase::WaitingToSend);
        assert_eq!(job.rewash_count, 0);
    }

    #[test]
    fn test_find_nonexistent() {
        let db = test_db();
        assert!(find_by_id(&db, "nope").unwrap().is_none());
    }

    #[test]
    fn test_wash_id_is_unique() {
        let db = test_db();
        insert(&db, &sample_job("WASH-000001", "U001", "Blue")).unwrap();
        let mut dup = sample_job("other", "U002", "Red");
        dup.wash_id = "WASH-000001".to_string();
        assert!(insert(&db, &dup).is_err());
    }

    #[test]
    fn test_query_by_uniform() {
        let db = test_db();
        insert(&db, &sample_job("WASH-000001", "U001", "Blue")).unwrap();
        insert(&db, &sample_job("WASH-000002", "U001", "Red")).unwrap();
        insert(&db, &sample_job("WASH-000003", "U002", "Blue")).unwrap();

        let all = query(&db, &WashJobFilter::default()).unwrap();
        assert_eq!(all.len(), 3);

        let rows = query(
            &db,
            &WashJobFilter {
                uniform_code: Some("U001".to_string()),
                color: Some("Blue".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].wash_id, "WASH-000001");

        let rows = query(
            &db,
            &WashJobFilter {
                wash_id: Some("WASH-000003".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(rows[0].uniform_code, "U002");
    }

    #[test]
    fn test_update_fields_partial() {
        let db = test_db();
        insert(&db, &sample_job("WASH-000001", "U001", "Blue")).unwrap();

        let changed = update_fields(
            &db,
            "WASH-000001",
            Some("washing"),
            None,
            "2026-01-02T00:00:00.000Z",
        )
        .unwrap();
        assert_eq!(changed, 1);

        let found = find_by_id(&db, "WASH-000001").unwrap().unwrap();
        assert_eq!(found.status, "washing");
        assert_eq!(found.created_at, "2026-01-01T00:00:00.000Z");

        update_fields(
            &db,
            "WASH-000001",
            None,
            Some("2025-12-30T00:00:00.000Z"),
            "2026-01-02T00:00:00.000Z",
        )
        .unwrap();
        let found = find_by_id(&db, "WASH-000001").unwrap().unwrap();
        assert_eq!(found.status, "washing");
        assert_eq!(found.created_at, "2025-12-30T00:00:00.000Z");

        assert_eq!(update_fields(&db, "missing", Some("washing"), None, "x").unwrap(), 0);
    }

    #[test]
    fn test_delete() {
        let db = test_db();
        insert(&db, &sample_job("WASH-000001", "U001", "Blue")).unwrap();
        assert_eq!(delete(&db, "WASH-000001").unwrap(), 1);
        assert_eq!(delete(&db, "WASH-000001").unwrap(), 0);
        assert!(find_by_id(&db, "WASH-000001").unwrap().is_none());
    }

    #[test]
    fn test_negative_rewash_count_is_invalid() {
        let mut row = sample_job("WASH-000001", "U001", "Blue");
        row.rewash_count = -1;
        assert!(matches!(
            row.to_job(),
            Err(DatabaseError::InvalidRow { table: "wash_jobs", .. })
        ));
    }
}
