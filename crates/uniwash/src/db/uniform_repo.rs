//! Uniform stock repository - one row per (uniform code, color) variant.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DatabaseError};
use crate::model::{StockStatus, UniformVariant};

const TABLE: &str = "uniforms";

/// A raw uniform row from the database.
#[derive(Debug, Clone)]
pub struct UniformRow {
    pub uniform_code: String,
    pub color: String,
    pub size: String,
    pub uniform_type: String,
    pub emp_id: Option<String>,
    pub emp_name: Option<String>,
    pub stock_status: String,
    pub rewash_count: i64,
    pub updated_at: String,
}

impl UniformRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            uniform_code: row.get("uniform_code")?,
            color: row.get("color")?,
            size: row.get("size")?,
            uniform_type: row.get("uniform_type")?,
            emp_id: row.get("emp_id")?,
            emp_name: row.get("emp_name")?,
            stock_status: row.get("stock_status")?,
            rewash_count: row.get("rewash_count")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn from_variant(variant: &UniformVariant, updated_at: &str) -> Self {
        Self {
            uniform_code: variant.uniform_code.clone(),
            color: variant.color.clone(),
            size: variant.size.clone(),
            uniform_type: variant.uniform_type.clone(),
            emp_id: variant.emp_id.clone(),
            emp_name: variant.emp_name.clone(),
            stock_status: variant.stock_status.as_str().to_string(),
            rewash_count: i64::from(variant.rewash_count),
            updated_at: updated_at.to_string(),
        }
    }

    pub fn to_variant(&self) -> Result<UniformVariant, DatabaseError> {
        let stock_status =
            StockStatus::parse(&self.stock_status).ok_or_else(|| DatabaseError::InvalidRow {
                table: TABLE,
                reason: format!("unknown stock status '{}'", self.stock_status),
            })?;
        let rewash_count = u32::try_from(self.rewash_count).map_err(|_| DatabaseError::InvalidRow {
            table: TABLE,
            reason: format!("negative rewash_count for {}", self.uniform_code),
        })?;

        Ok(UniformVariant {
            uniform_code: self.uniform_code.clone(),
            color: self.color.clone(),
            size: self.size.clone(),
            uniform_type: self.uniform_type.clone(),
            emp_id: self.emp_id.clone(),
            emp_name: self.emp_name.clone(),
            stock_status,
            rewash_count,
        })
    }
}

/// Inserts or replaces a variant.
pub fn upsert(db: &Database, row: &UniformRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO uniforms (uniform_code, color, size, uniform_type, emp_id, emp_name,
             stock_status, rewash_count, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT (uniform_code, color) DO UPDATE SET
             size = excluded.size, uniform_type = excluded.uniform_type,
             emp_id = excluded.emp_id, emp_name = excluded.emp_name,
             stock_status = excluded.stock_status, rewash_count = excluded.rewash_count,
             updated_at = excluded.updated_at",
            params![
                row.uniform_code,
                row.color,
                row.size,
                row.uniform_type,
                row.emp_id,
                row.emp_name,
                row.stock_status,
                row.rewash_count,
                row.updated_at,
            ],
        )?;
        Ok(())
    })
}

/// Finds all variants sharing `code`, optionally narrowed to one color.
pub fn find_by_code(
    db: &Database,
    code: &str,
    color: Option<&str>,
) -> Result<Vec<UniformRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM uniforms WHERE uniform_code = ?1 AND (?2 IS NULL OR color = ?2)
             ORDER BY color ASC",
        )?;
        let rows = stmt
            .query_map(params![code, color], UniformRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Returns the stock rewash counter, or `None` for an unknown variant.
pub fn rewash_count(db: &Database, code: &str, color: &str) -> Result<Option<i64>, DatabaseError> {
    db.with_conn(|conn| {
        let count = conn
            .query_row(
                "SELECT rewash_count FROM uniforms WHERE uniform_code = ?1 AND color = ?2",
                params![code, color],
                |r| r.get(0),
            )
            .optional()?;
        Ok(count)
    })
}

pub fn set_rewash_count(
    db: &Database,
    code: &str,
    color: &str,
    count: i64,
    updated_at: &str,
) -> Result<usize, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE uniforms SET rewash_count = ?3, updated_at = ?4
             WHERE uniform_code = ?1 AND color = ?2",
            params![code, color, count, updated_at],
        )?;
        Ok(changed)
    })
}

pub fn set_stock_status(
    db: &Database,
    code: &str,
    color: &str,
    status: &str,
    updated_at: &str,
) -> Result<usize, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE uniforms SET stock_status = ?3, updated_at = ?4
             WHERE uniform_code = ?1 AND color = ?2",
            params![code, color, status, updated_at],
        )?;
        Ok(changed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(code: &str, color: &str) -> UniformVariant {
        UniformVariant {
            uniform_code: code.to_string(),
            color: color.to_string(),
            size: "L".to_string(),
            uniform_type: "Smock".to_string(),
            emp_id: Some("E01".to_string()),
            emp_name: Some("Somchai".to_string()),
            stock_status: StockStatus::Assigned,
            rewash_count: 0,
        }
    }

    const NOW: &str = "2026-01-01T00:00:00.000Z";

    #[test]
    fn test_upsert_and_find() {
        let db = Database::open_in_memory().unwrap();
        upsert(&db, &UniformRow::from_variant(&variant("U001", "Blue"), NOW)).unwrap();
        upsert(&db, &UniformRow::from_variant(&variant("U001", "Red"), NOW)).unwrap();
        upsert(&db, &UniformRow::from_variant(&variant("U002", "Blue"), NOW)).unwrap();

        let rows = find_by_code(&db, "U001", None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].color, "Blue");

        let rows = find_by_code(&db, "U001", Some("Red")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].to_variant().unwrap(), variant("U001", "Red"));

        assert!(find_by_code(&db, "U404", None).unwrap().is_empty());
    }

    #[test]
    fn test_upsert_replaces() {
        let db = Database::open_in_memory().unwrap();
        let mut v = variant("U001", "Blue");
        upsert(&db, &UniformRow::from_variant(&v, NOW)).unwrap();
        v.size = "XL".to_string();
        upsert(&db, &UniformRow::from_variant(&v, NOW)).unwrap();

        let rows = find_by_code(&db, "U001", None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].size, "XL");
    }

    #[test]
    fn test_rewash_count_and_status() {
        let db = Database::open_in_memory().unwrap();
        upsert(&db, &UniformRow::from_variant(&variant("U001", "Blue"), NOW)).unwrap();

        assert_eq!(rewash_count(&db, "U001", "Blue").unwrap(), Some(0));
        assert_eq!(rewash_count(&db, "U001", "Green").unwrap(), None);

        assert_eq!(set_rewash_count(&db, "U001", "Blue", 2, NOW).unwrap(), 1);
        assert_eq!(rewash_count(&db, "U001", "Blue").unwrap(), Some(2));

        assert_eq!(set_stock_status(&db, "U001", "Blue", "scrapped", NOW).unwrap(), 1);
        let v = find_by_code(&db, "U001", Some("Blue")).unwrap()[0]
            .to_variant()
            .unwrap();
        assert_eq!(v.stock_status, StockStatus::Scrapped);

        assert_eq!(set_stock_status(&db, "U404", "Blue", "scrapped", NOW).unwrap(), 0);
    }
}
