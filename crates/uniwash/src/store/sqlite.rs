//! SQLite-backed implementation of every store role.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;

use super::{
    ActiveFilter, ActiveStore, HistoryStore, MasterStore, StoreError, StoreResult,
    WashIdGenerator, WashJobPatch,
};
use crate::db::history_repo::{self, HistoryRow};
use crate::db::uniform_repo::{self, UniformRow};
use crate::db::wash_job_repo::{self, WashJobFilter, WashJobRow};
use crate::db::{employee_repo, format_timestamp, sequence_repo, Database, DatabaseError};
use crate::model::{Employee, StockStatus, UniformVariant, WashHistoryEntry, WashJob};

const WASH_ID_SEQUENCE: &str = "wash_id";

/// Formats the n-th wash id.
pub fn format_wash_id(n: i64) -> String {
    format!("WASH-{:06}", n)
}

/// Active, history and master store on a single [`Database`].
///
/// Active-store mutations publish the full job snapshot to subscribers.
pub struct SqliteWashStore {
    db: Database,
    snapshots: broadcast::Sender<Vec<WashJob>>,
}

impl SqliteWashStore {
    pub fn new(db: Database, snapshot_capacity: usize) -> Self {
        let (snapshots, _) = broadcast::channel(snapshot_capacity.max(1));
        Self { db, snapshots }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Adds or replaces a uniform variant in stock.
    pub fn register_uniform(&self, variant: &UniformVariant) -> Result<(), DatabaseError> {
        let now = format_timestamp(Utc::now());
        uniform_repo::upsert(&self.db, &UniformRow::from_variant(variant, &now))
    }

    /// Adds or replaces an employee.
    pub fn register_employee(&self, employee: &Employee) -> Result<(), DatabaseError> {
        employee_repo::upsert(&self.db, employee)
    }

    fn load(&self, filter: &WashJobFilter) -> Result<Vec<WashJob>, DatabaseError> {
        wash_job_repo::query(&self.db, filter)?
            .iter()
            .map(WashJobRow::to_job)
            .collect()
    }

    fn publish_snapshot(&self) {
        if self.snapshots.receiver_count() == 0 {
            return;
        }
        match self.load(&WashJobFilter::default()) {
            Ok(jobs) => {
                // No receivers left is fine.
                let _ = self.snapshots.send(jobs);
            }
            Err(e) => log::warn!("Failed to load wash job snapshot: {}", e),
        }
    }
}

#[async_trait]
impl ActiveStore for SqliteWashStore {
    async fn query_active(&self, filter: &ActiveFilter) -> StoreResult<Vec<WashJob>> {
        let filter = WashJobFilter {
            uniform_code: filter.uniform_code.clone(),
            color: filter.color.clone(),
            wash_id: filter.wash_id.clone(),
        };
        Ok(self.load(&filter)?)
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<WashJob>> {
        match wash_job_repo::find_by_id(&self.db, id)? {
            Some(row) => Ok(Some(row.to_job()?)),
            None => Ok(None),
        }
    }

    async fn create(&self, job: &WashJob) -> StoreResult<()> {
        let now = format_timestamp(Utc::now());
        wash_job_repo::insert(&self.db, &WashJobRow::from_job(job, &now))?;
        self.publish_snapshot();
        Ok(())
    }

    async fn update(&self, id: &str, patch: &WashJobPatch) -> StoreResult<()> {
        let now = format_timestamp(Utc::now());
        let created_at = patch.created_at.map(format_timestamp);
        let changed = wash_job_repo::update_fields(
            &self.db,
            id,
            patch.status.map(|s| s.as_key()),
            created_at.as_deref(),
            &now,
        )?;
        if changed == 0 {
            return Err(StoreError::Missing { id: id.to_string() });
        }
        self.publish_snapshot();
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let removed = wash_job_repo::delete(&self.db, id)?;
        if removed == 0 {
            log::debug!("Delete of unknown wash job {} ignored", id);
        } else {
            self.publish_snapshot();
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Vec<WashJob>> {
        self.snapshots.subscribe()
    }
}

#[async_trait]
impl HistoryStore for SqliteWashStore {
    async fn append(&self, entry: &WashHistoryEntry) -> StoreResult<()> {
        history_repo::insert(&self.db, &HistoryRow::from_entry(entry))?;
        Ok(())
    }

    async fn query_all(&self) -> StoreResult<Vec<WashHistoryEntry>> {
        let entries = history_repo::list_all(&self.db)?
            .iter()
            .map(HistoryRow::to_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(history_repo::count(&self.db)?)
    }
}

#[async_trait]
impl MasterStore for SqliteWashStore {
    async fn find_uniforms_by_code(
        &self,
        code: &str,
        color: Option<&str>,
    ) -> StoreResult<Vec<UniformVariant>> {
        let variants = uniform_repo::find_by_code(&self.db, code, color)?
            .iter()
            .map(UniformRow::to_variant)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(variants)
    }

    async fn find_employee(&self, emp_id: &str) -> StoreResult<Option<Employee>> {
        Ok(employee_repo::find_by_id(&self.db, emp_id)?)
    }

    async fn get_rewash_count(&self, code: &str, color: &str) -> StoreResult<u32> {
        let count = uniform_repo::rewash_count(&self.db, code, color)?.unwrap_or(0);
        u32::try_from(count).map_err(|_| {
            StoreError::Database(DatabaseError::InvalidRow {
                table: "uniforms",
                reason: format!("negative rewash_count for {} ({})", code, color),
            })
        })
    }

    async fn set_rewash_count(&self, code: &str, color: &str, count: u32) -> StoreResult<()> {
        let now = format_timestamp(Utc::now());
        let changed = uniform_repo::set_rewash_count(&self.db, code, color, i64::from(count), &now)?;
        if changed == 0 {
            log::warn!(
                "Rewash counter for unknown uniform {} ({}) not stored",
                code,
                color
            );
        }
        Ok(())
    }

    async fn scrap_uniform(&self, code: &str, color: &str) -> StoreResult<()> {
        let now = format_timestamp(Utc::now());
        let changed = uniform_repo::set_stock_status(
            &self.db,
            code,
            color,
            StockStatus::Scrapped.as_str(),
            &now,
        )?;
        if changed == 0 {
            log::warn!("Scrap of unknown uniform {} ({}) ignored", code, color);
        } else {
            log::info!("Uniform {} ({}) scrapped", code, color);
        }
        Ok(())
    }

    async fn return_to_stock_after_esd(&self, entry: &WashHistoryEntry) -> StoreResult<()> {
        let rows =
            uniform_repo::find_by_code(&self.db, &entry.uniform_code, Some(&entry.color))?;
        let Some(row) = rows.first() else {
            log::warn!(
                "Uniform {} ({}) not in stock, nothing to return",
                entry.uniform_code,
                entry.color
            );
            return Ok(());
        };

        let status = if row.emp_id.as_deref().is_some_and(|id| !id.is_empty()) {
            StockStatus::Assigned
        } else {
            StockStatus::Available
        };
        let now = format_timestamp(Utc::now());
        uniform_repo::set_stock_status(
            &self.db,
            &entry.uniform_code,
            &entry.color,
            status.as_str(),
            &now,
        )?;
        Ok(())
    }
}

#[async_trait]
impl WashIdGenerator for SqliteWashStore {
    async fn generate_wash_id(&self) -> StoreResult<String> {
        let n = sequence_repo::next_value(&self.db, WASH_ID_SEQUENCE)?;
        Ok(format_wash_id(n))
    }
}
