use serde::{Deserialize, Serialize};

use crate::status::StatusThresholds;

pub const CONFIG_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// SQLite file; `~/.uniwash/data/uniwash.db` when unset.
    #[serde(default)]
    pub database_path: Option<String>,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,
}

fn default_notification_capacity() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            database_path: None,
            lifecycle: LifecycleConfig::default(),
            display: DisplayConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
            notification_capacity: default_notification_capacity(),
        }
    }
}

/// Wash-cycle rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// A uniform is scrapped once its rewash counter goes above this.
    #[serde(default = "default_rewash_limit")]
    pub rewash_limit: u32,
    #[serde(default = "default_washing_after_days")]
    pub washing_after_days: i64,
    #[serde(default = "default_completed_after_days")]
    pub completed_after_days: i64,
    /// Write a history entry for jobs removed by hand.
    #[serde(default = "default_true")]
    pub record_discards: bool,
}

fn default_rewash_limit() -> u32 {
    3
}

fn default_washing_after_days() -> i64 {
    1
}

fn default_completed_after_days() -> i64 {
    3
}

fn default_true() -> bool {
    true
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            rewash_limit: default_rewash_limit(),
            washing_after_days: default_washing_after_days(),
            completed_after_days: default_completed_after_days(),
            record_discards: true,
        }
    }
}

impl LifecycleConfig {
    pub fn thresholds(&self) -> StatusThresholds {
        StatusThresholds {
            washing_after_days: self.washing_after_days,
            completed_after_days: self.completed_after_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
    #[serde(default = "default_rows_per_page")]
    pub history_rows_per_page: usize,
}

fn default_rows_per_page() -> usize {
    10
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rows_per_page: default_rows_per_page(),
            history_rows_per_page: default_rows_per_page(),
        }
    }
}

/// Master-data lookup cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_cache_capacity() -> u64 {
    1000
}

fn default_cache_ttl_secs() -> u64 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
