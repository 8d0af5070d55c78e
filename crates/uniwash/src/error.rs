use std::path::PathBuf;
use thiserror::Error;

use crate::status::WashPhase;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum UniwashError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Wash error: {0}")]
    Wash(#[from] WashError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

/// Failures of lifecycle operations.
///
/// Everything except [`WashError::Store`] is detected before the first write,
/// so the stores are untouched when one of those is returned.
#[derive(Error, Debug)]
pub enum WashError {
    #[error("Incomplete data: {0}")]
    Validation(String),

    #[error("Uniform {uniform_code} ({color}) is already being processed")]
    Conflict { uniform_code: String, color: String },

    #[error("Uniform {uniform_code} ({color}) has been scrapped")]
    Scrapped { uniform_code: String, color: String },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Wash job {wash_id} is {found}, expected {expected}")]
    InvalidState {
        wash_id: String,
        expected: WashPhase,
        found: WashPhase,
    },

    #[error("Cannot shift {wash_id} by {delta_days} days: date out of range")]
    DateOutOfRange { wash_id: String, delta_days: i64 },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Coarse failure category shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    InvalidState,
    OutOfRange,
    Store,
}

impl WashError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        WashError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            WashError::Validation(_) => ErrorCategory::Validation,
            WashError::Conflict { .. } | WashError::Scrapped { .. } => ErrorCategory::Conflict,
            WashError::NotFound { .. } => ErrorCategory::NotFound,
            WashError::InvalidState { .. } => ErrorCategory::InvalidState,
            WashError::DateOutOfRange { .. } => ErrorCategory::OutOfRange,
            WashError::Store(_) => ErrorCategory::Store,
        }
    }
}

pub type Result<T> = std::result::Result<T, UniwashError>;
