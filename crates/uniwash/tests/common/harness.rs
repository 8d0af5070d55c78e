//! Test harness for lifecycle tests.
//!
//! Each harness owns its own in-memory database, so tests never share state.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::broadcast;

use uniwash::config::{CacheConfig, LifecycleConfig};
use uniwash::{
    CreateOutcome, Database, Employee, FixedClock, NewWashJob, Notification,
    NotificationBroadcaster, SqliteWashStore, Stores, UniformVariant, WashJob, WashLifecycle,
};

pub struct TestHarness {
    pub store: Arc<SqliteWashStore>,
    pub clock: Arc<FixedClock>,
    pub lifecycle: Arc<WashLifecycle>,
    pub notifications: broadcast::Receiver<Notification>,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(LifecycleConfig::default())
    }

    pub fn with_config(config: LifecycleConfig) -> Self {
        let store = Arc::new(SqliteWashStore::new(
            Database::open_in_memory().expect("Failed to create test database"),
            64,
        ));
        let stores = Stores::sqlite(store.clone(), &CacheConfig::default());
        Self::with_stores(store, stores, config)
    }

    /// Uses `stores` for the controller while keeping `store` for seeding and
    /// inspection.
    pub fn with_stores(store: Arc<SqliteWashStore>, stores: Stores, config: LifecycleConfig) -> Self {
        let clock = Arc::new(FixedClock::new(start_time()));
        let broadcaster = NotificationBroadcaster::new(64);
        let notifications = broadcaster.subscribe();
        let lifecycle = Arc::new(WashLifecycle::new(stores, clock.clone(), config, broadcaster));
        Self {
            store,
            clock,
            lifecycle,
            notifications,
        }
    }

    pub fn register_uniform(&self, variant: UniformVariant) {
        self.store.register_uniform(&variant).unwrap();
    }

    pub fn register_employee(&self, employee: Employee) {
        self.store.register_employee(&employee).unwrap();
    }

    pub fn advance_days(&self, days: i64) {
        self.clock.advance(Duration::days(days));
    }

    /// Creates a job and expects it to become active.
    pub async fn create_job(&self, code: &str, color: &str) -> WashJob {
        match self.lifecycle.create(NewWashJob::new(code, color)).await.unwrap() {
            CreateOutcome::Created(job) => job,
            other => panic!("expected a created job, got {:?}", other),
        }
    }

    pub async fn active_jobs(&self) -> Vec<WashJob> {
        self.lifecycle.recompute_all().await.unwrap()
    }

    pub async fn history(&self) -> Vec<uniwash::WashHistoryEntry> {
        use uniwash::store::HistoryStore;
        self.store.query_all().await.unwrap()
    }

    pub async fn stock(&self, code: &str, color: &str) -> UniformVariant {
        use uniwash::store::MasterStore;
        self.store
            .find_uniforms_by_code(code, Some(color))
            .await
            .unwrap()
            .into_iter()
            .next()
            .expect("uniform not registered")
    }

    /// The most recent notification, draining older ones.
    pub fn last_notification(&mut self) -> Option<Notification> {
        let mut last = None;
        while let Ok(n) = self.notifications.try_recv() {
            last = Some(n);
        }
        last
    }
}
