//! A store wrapper that records every call and can be told to fail one.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::broadcast;

use uniwash::store::{
    ActiveFilter, ActiveStore, HistoryStore, MasterStore, StoreError, StoreResult,
    WashIdGenerator, WashJobPatch,
};
use uniwash::{Employee, SqliteWashStore, Stores, UniformVariant, WashHistoryEntry, WashJob};

pub struct RecordingStore {
    inner: Arc<SqliteWashStore>,
    calls: Mutex<Vec<String>>,
    fail_on: Mutex<Option<String>>,
}

impl RecordingStore {
    pub fn new(inner: Arc<SqliteWashStore>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: Mutex::new(Vec::new()),
            fail_on: Mutex::new(None),
        })
    }

    pub fn stores(self: &Arc<Self>) -> Stores {
        Stores {
            active: self.clone(),
            history: self.clone(),
            master: self.clone(),
            ids: self.clone(),
        }
    }

    /// Makes the next call named `call` fail with a backend error.
    pub fn fail_on(&self, call: &str) {
        *self.fail_on.lock().unwrap() = Some(call.to_string());
    }

    /// Recorded mutating calls, in order.
    pub fn writes(&self) -> Vec<String> {
        const WRITES: [&str; 7] = [
            "create",
            "update",
            "delete",
            "append",
            "set_rewash_count",
            "scrap_uniform",
            "return_to_stock_after_esd",
        ];
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| WRITES.iter().any(|w| c.starts_with(w)))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: String) -> StoreResult<()> {
        let name = call.split('(').next().unwrap_or_default().to_string();
        self.calls.lock().unwrap().push(call);
        let mut fail_on = self.fail_on.lock().unwrap();
        if fail_on.as_deref() == Some(name.as_str()) {
            *fail_on = None;
            return Err(StoreError::Backend(format!("injected failure in {}", name)));
        }
        Ok(())
    }
}

#[async_trait]
impl ActiveStore for RecordingStore {
    async fn query_active(&self, filter: &ActiveFilter) -> StoreResult<Vec<WashJob>> {
        self.record("query_active".to_string())?;
        self.inner.query_active(filter).await
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<WashJob>> {
        self.record(format!("get_by_id({})", id))?;
        self.inner.get_by_id(id).await
    }

    async fn create(&self, job: &WashJob) -> StoreResult<()> {
        self.record(format!("create({})", job.id))?;
        ActiveStore::create(self.inner.as_ref(), job).await
    }

    async fn update(&self, id: &str, patch: &WashJobPatch) -> StoreResult<()> {
        self.record(format!("update({})", id))?;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.record(format!("delete({})", id))?;
        self.inner.delete(id).await
    }

    fn subscribe(&self) -> broadcast::Receiver<Vec<WashJob>> {
        self.inner.subscribe()
    }
}

#[async_trait]
impl HistoryStore for RecordingStore {
    async fn append(&self, entry: &WashHistoryEntry) -> StoreResult<()> {
        self.record(format!("append({})", entry.status_text()))?;
        self.inner.append(entry).await
    }

    async fn query_all(&self) -> StoreResult<Vec<WashHistoryEntry>> {
        self.record("query_all".to_string())?;
        self.inner.query_all().await
    }

    async fn count(&self) -> StoreResult<u64> {
        self.record("count".to_string())?;
        self.inner.count().await
    }
}

#[async_trait]
impl MasterStore for RecordingStore {
    async fn find_uniforms_by_code(
        &self,
        code: &str,
        color: Option<&str>,
    ) -> StoreResult<Vec<UniformVariant>> {
        self.record(format!("find_uniforms_by_code({})", code))?;
        self.inner.find_uniforms_by_code(code, color).await
    }

    async fn find_employee(&self, emp_id: &str) -> StoreResult<Option<Employee>> {
        self.record(format!("find_employee({})", emp_id))?;
        self.inner.find_employee(emp_id).await
    }

    async fn get_rewash_count(&self, code: &str, color: &str) -> StoreResult<u32> {
        self.record(format!("get_rewash_count({})", code))?;
        self.inner.get_rewash_count(code, color).await
    }

    async fn set_rewash_count(&self, code: &str, color: &str, count: u32) -> StoreResult<()> {
        self.record(format!("set_rewash_count({})", count))?;
        self.inner.set_rewash_count(code, color, count).await
    }

    async fn scrap_uniform(&self, code: &str, color: &str) -> StoreResult<()> {
        self.record(format!("scrap_uniform({})", code))?;
        self.inner.scrap_uniform(code, color).await
    }

    async fn return_to_stock_after_esd(&self, entry: &WashHistoryEntry) -> StoreResult<()> {
        self.record(format!("return_to_stock_after_esd({})", entry.uniform_code))?;
        self.inner.return_to_stock_after_esd(entry).await
    }
}

#[async_trait]
impl WashIdGenerator for RecordingStore {
    async fn generate_wash_id(&self) -> StoreResult<String> {
        self.record("generate_wash_id".to_string())?;
        self.inner.generate_wash_id().await
    }
}
