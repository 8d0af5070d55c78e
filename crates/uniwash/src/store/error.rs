//! Store error types.

use thiserror::Error;

use crate::db::DatabaseError;

/// Errors surfaced by store collaborators.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// An update targeted a record that does not exist.
    #[error("Record not found: {id}")]
    Missing { id: String },

    /// Failure reported by a non-SQLite backend.
    #[error("Store backend error: {0}")]
    Backend(String),
}
