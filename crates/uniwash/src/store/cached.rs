//! Master-data lookups with an in-memory hot cache in front of the backing
//! store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::sync::Cache;

use super::{MasterStore, StoreResult};
use crate::config::CacheConfig;
use crate::model::{Employee, UniformVariant, WashHistoryEntry};

/// Caches uniform and employee reads from an inner [`MasterStore`].
///
/// Uniform variants are cached per code; any write touching a code drops
/// its entry. Rewash counters are always read from the inner store.
pub struct CachedMasterStore<M: MasterStore> {
    inner: Arc<M>,
    uniforms: Cache<String, Arc<Vec<UniformVariant>>>,
    employees: Cache<String, Option<Employee>>,
}

impl<M: MasterStore> CachedMasterStore<M> {
    pub fn new(inner: Arc<M>, config: &CacheConfig) -> Self {
        let ttl = Duration::from_secs(config.ttl_secs);
        Self {
            inner,
            uniforms: Cache::builder()
                .max_capacity(config.capacity)
                .time_to_live(ttl)
                .build(),
            employees: Cache::builder()
                .max_capacity(config.capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Drops every cached entry, e.g. after master data was re-seeded.
    pub fn invalidate_all(&self) {
        self.uniforms.invalidate_all();
        self.employees.invalidate_all();
    }

    fn invalidate_code(&self, code: &str) {
        self.uniforms.invalidate(code);
    }
}

#[async_trait]
impl<M: MasterStore + 'static> MasterStore for CachedMasterStore<M> {
    async fn find_uniforms_by_code(
        &self,
        code: &str,
        color: Option<&str>,
    ) -> StoreResult<Vec<UniformVariant>> {
        let variants = match self.uniforms.get(code) {
            Some(hit) => hit,
            None => {
                let loaded = Arc::new(self.inner.find_uniforms_by_code(code, None).await?);
                self.uniforms.insert(code.to_string(), Arc::clone(&loaded));
                loaded
            }
        };

        Ok(variants
            .iter()
            .filter(|v| color.map_or(true, |c| v.color == c))
            .cloned()
            .collect())
    }

    async fn find_employee(&self, emp_id: &str) -> StoreResult<Option<Employee>> {
        if let Some(hit) = self.employees.get(emp_id) {
            return Ok(hit);
        }
        let loaded = self.inner.find_employee(emp_id).await?;
        self.employees.insert(emp_id.to_string(), loaded.clone());
        Ok(loaded)
    }

    async fn get_rewash_count(&self, code: &str, color: &str) -> StoreResult<u32> {
        self.inner.get_rewash_count(code, color).await
    }

    async fn set_rewash_count(&self, code: &str, color: &str, count: u32) -> StoreResult<()> {
        let result = self.inner.set_rewash_count(code, color, count).await;
        self.invalidate_code(code);
        result
    }

    async fn scrap_uniform(&self, code: &str, color: &str) -> StoreResult<()> {
        let result = self.inner.scrap_uniform(code, color).await;
        self.invalidate_code(code);
        result
    }

    async fn return_to_stock_after_esd(&self, entry: &WashHistoryEntry) -> StoreResult<()> {
        let result = self.inner.return_to_stock_after_esd(entry).await;
        self.invalidate_code(&entry.uniform_code);
        result
    }
}
