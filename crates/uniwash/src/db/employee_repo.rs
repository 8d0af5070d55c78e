//! Employee master repository (lookups used to auto-fill wash jobs).

use rusqlite::{params, OptionalExtension};

use super::{Database, DatabaseError};
use crate::model::Employee;

/// Inserts or replaces an employee.
pub fn upsert(db: &Database, employee: &Employee) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO employees (emp_id, emp_name, department) VALUES (?1, ?2, ?3)
             ON CONFLICT (emp_id) DO UPDATE SET
             emp_name = excluded.emp_name, department = excluded.department",
            params![employee.emp_id, employee.emp_name, employee.department],
        )?;
        Ok(())
    })
}

pub fn find_by_id(db: &Database, emp_id: &str) -> Result<Option<Employee>, DatabaseError> {
    db.with_conn(|conn| {
        let employee = conn
            .query_row(
                "SELECT emp_id, emp_name, department FROM employees WHERE emp_id = ?1",
                params![emp_id],
                |r| {
                    Ok(Employee {
                        emp_id: r.get(0)?,
                        emp_name: r.get(1)?,
                        department: r.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(employee)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_and_find() {
        let db = Database::open_in_memory().unwrap();
        let mut emp = Employee {
            emp_id: "E01".to_string(),
            emp_name: "Somchai".to_string(),
            department: "Cleanroom".to_string(),
        };
        upsert(&db, &emp).unwrap();
        assert_eq!(find_by_id(&db, "E01").unwrap(), Some(emp.clone()));

        emp.department = "Assembly".to_string();
        upsert(&db, &emp).unwrap();
        assert_eq!(find_by_id(&db, "E01").unwrap().unwrap().department, "Assembly");

        assert!(find_by_id(&db, "E99").unwrap().is_none());
    }
}
