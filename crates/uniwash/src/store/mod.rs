//! Contracts for the collaborators the lifecycle controller drives.
//!
//! The active store holds in-progress wash jobs, the history store is the
//! append-only audit log, and the master store owns uniform stock and
//! employee data. None of them promise atomicity across each other.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::model::{Employee, UniformVariant, WashHistoryEntry, WashJob};
use crate::status::WashPhase;

pub mod cached;
pub mod error;
pub mod sqlite;

pub use cached::CachedMasterStore;
pub use error::StoreError;
pub use sqlite::SqliteWashStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Field filter for active job queries. Unset fields match everything.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    pub uniform_code: Option<String>,
    pub color: Option<String>,
    pub wash_id: Option<String>,
}

impl ActiveFilter {
    pub fn uniform(code: &str, color: &str) -> Self {
        Self {
            uniform_code: Some(code.to_string()),
            color: Some(color.to_string()),
            wash_id: None,
        }
    }

    pub fn wash_id(wash_id: &str) -> Self {
        Self {
            wash_id: Some(wash_id.to_string()),
            ..Default::default()
        }
    }
}

/// Partial update of an active job.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WashJobPatch {
    pub status: Option<WashPhase>,
    pub created_at: Option<DateTime<Utc>>,
}

impl WashJobPatch {
    pub fn status(status: WashPhase) -> Self {
        Self {
            status: Some(status),
            created_at: None,
        }
    }

    pub fn created_at(created_at: DateTime<Utc>) -> Self {
        Self {
            status: None,
            created_at: Some(created_at),
        }
    }
}

/// The mutable working set of in-progress wash jobs.
#[async_trait]
pub trait ActiveStore: Send + Sync {
    async fn query_active(&self, filter: &ActiveFilter) -> StoreResult<Vec<WashJob>>;

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<WashJob>>;

    /// Creates `job` under the caller-chosen `job.id`.
    async fn create(&self, job: &WashJob) -> StoreResult<()>;

    async fn update(&self, id: &str, patch: &WashJobPatch) -> StoreResult<()>;

    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Receives the full active snapshot after every change. Dropping the
    /// receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<Vec<WashJob>>;
}

/// The append-only wash history.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, entry: &WashHistoryEntry) -> StoreResult<()>;

    async fn query_all(&self) -> StoreResult<Vec<WashHistoryEntry>>;

    async fn count(&self) -> StoreResult<u64>;
}

/// Uniform stock and employee master data.
#[async_trait]
pub trait MasterStore: Send + Sync {
    /// All variants sharing `code`, narrowed to `color` when given.
    async fn find_uniforms_by_code(
        &self,
        code: &str,
        color: Option<&str>,
    ) -> StoreResult<Vec<UniformVariant>>;

    async fn find_employee(&self, emp_id: &str) -> StoreResult<Option<Employee>>;

    /// Stock-side rewash counter; 0 for an unknown variant.
    async fn get_rewash_count(&self, code: &str, color: &str) -> StoreResult<u32>;

    async fn set_rewash_count(&self, code: &str, color: &str, count: u32) -> StoreResult<()>;

    /// Permanently removes the variant from circulation.
    async fn scrap_uniform(&self, code: &str, color: &str) -> StoreResult<()>;

    /// Puts the uniform back into stock after a passed ESD test.
    async fn return_to_stock_after_esd(&self, entry: &WashHistoryEntry) -> StoreResult<()>;
}

/// Issues wash ids unique across active and historical jobs.
#[async_trait]
pub trait WashIdGenerator: Send + Sync {
    async fn generate_wash_id(&self) -> StoreResult<String>;
}

/// The set of collaborators a controller works against.
#[derive(Clone)]
pub struct Stores {
    pub active: Arc<dyn ActiveStore>,
    pub history: Arc<dyn HistoryStore>,
    pub master: Arc<dyn MasterStore>,
    pub ids: Arc<dyn WashIdGenerator>,
}

impl Stores {
    /// Uses one SQLite store for every role, with cached master lookups.
    pub fn sqlite(store: Arc<SqliteWashStore>, cache: &crate::config::CacheConfig) -> Self {
        Self {
            active: store.clone(),
            history: store.clone(),
            master: Arc::new(CachedMasterStore::new(store.clone(), cache)),
            ids: store,
        }
    }
}
