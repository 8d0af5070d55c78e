//! Process-wide state built once from the config file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::sync::broadcast;
use uniwash::config::{default_config_path, load_or_default, Config};
use uniwash::db::default_database_path;
use uniwash::{
    Database, Notification, NotificationBroadcaster, SqliteWashStore, Stores, SystemClock,
    WashLifecycle,
};

pub struct AppState {
    pub config: Config,

    /// Direct handle for master-data registration.
    pub store: Arc<SqliteWashStore>,

    pub lifecycle: Arc<WashLifecycle>,

    /// Subscribed before any command runs so no notice is missed.
    pub notifications: broadcast::Receiver<Notification>,
}

impl AppState {
    /// Loads the config (defaults when the file is missing), starts logging
    /// and opens the database.
    pub fn init(config_path: Option<&Path>, database: Option<&Path>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => default_config_path().ok_or_else(|| anyhow!("Cannot determine home directory"))?,
        };
        let config = load_or_default(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        uniwash::logging::init_logging(&config.logging)?;
        tracing::debug!(config = %config_path.display(), "Configuration loaded");

        let db_path = resolve_database_path(database, &config)?;
        let db = Database::open(&db_path)
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;

        Ok(Self::with_database(config, db))
    }

    pub fn with_database(config: Config, db: Database) -> Self {
        let store = Arc::new(SqliteWashStore::new(db, config.notification_capacity));
        let stores = Stores::sqlite(store.clone(), &config.cache);

        let broadcaster = NotificationBroadcaster::new(config.notification_capacity);
        let notifications = broadcaster.subscribe();

        let lifecycle = WashLifecycle::new(
            stores,
            Arc::new(SystemClock),
            config.lifecycle.clone(),
            broadcaster,
        )
        .with_display(config.display.clone());

        Self {
            config,
            store,
            lifecycle: Arc::new(lifecycle),
            notifications,
        }
    }

    /// Notifications sent since the last call.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut drained = Vec::new();
        loop {
            match self.notifications.try_recv() {
                Ok(n) => drained.push(n),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        drained
    }
}

fn resolve_database_path(flag: Option<&Path>, config: &Config) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = &config.database_path {
        return Ok(PathBuf::from(path));
    }
    default_database_path().ok_or_else(|| anyhow!("Cannot determine home directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_precedence() {
        let mut config = Config::default();
        config.database_path = Some("/tmp/from-config.db".to_string());

        let flag = PathBuf::from("/tmp/from-flag.db");
        assert_eq!(resolve_database_path(Some(&flag), &config).unwrap(), flag);
        assert_eq!(
            resolve_database_path(None, &config).unwrap(),
            PathBuf::from("/tmp/from-config.db")
        );
    }

    #[tokio::test]
    async fn test_with_database_wires_notifications() {
        let mut state = AppState::with_database(Config::default(), Database::open_in_memory().unwrap());
        assert!(state.drain_notifications().is_empty());

        state.lifecycle.delete("WASH-999999").await.unwrap();
        let notices = state.drain_notifications();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "Deleted Successfully");
    }
}
