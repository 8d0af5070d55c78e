pub mod broadcast;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod status;
pub mod store;

pub use broadcast::{Notification, NotificationBroadcaster, NotificationLevel};
pub use config::{load_config, Config};
pub use db::Database;
pub use error::{ConfigError, ErrorCategory, Result, UniwashError, WashError};
pub use export::ExportTable;
pub use lifecycle::{
    ActiveQuery, BoardUpdate, BoardWatcher, Clock, CreateOutcome, EsdFailOutcome, FixedClock,
    Page, ShiftOutcome, SummaryCounts, SystemClock, WashLifecycle, WashRow,
};
pub use model::{Employee, NewWashJob, StockStatus, TestResult, UniformVariant, WashHistoryEntry, WashJob};
pub use status::{StatusThresholds, WashPhase};
pub use store::{SqliteWashStore, StoreError, Stores};
