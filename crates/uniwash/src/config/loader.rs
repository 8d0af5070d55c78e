use std::path::{Path, PathBuf};

use crate::config::schema::{Config, CONFIG_VERSION};
use crate::error::ConfigError;

/// `~/.uniwash/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".uniwash").join("config.json"))
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

/// Loads `path` if it exists, otherwise falls back to the defaults.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    load_config(path)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(invalid(format!(
            "Unsupported config version: {}",
            config.version
        )));
    }

    let lifecycle = &config.lifecycle;
    if lifecycle.washing_after_days < 0 {
        return Err(invalid("lifecycle.washing_after_days must not be negative"));
    }
    if lifecycle.completed_after_days < lifecycle.washing_after_days {
        return Err(invalid(format!(
            "lifecycle.completed_after_days ({}) must be >= washing_after_days ({})",
            lifecycle.completed_after_days, lifecycle.washing_after_days
        )));
    }

    if config.display.rows_per_page == 0 || config.display.history_rows_per_page == 0 {
        return Err(invalid("display rows per page must be at least 1"));
    }
    if config.cache.capacity == 0 {
        return Err(invalid("cache.capacity must be at least 1"));
    }
    if config.notification_capacity == 0 {
        return Err(invalid("notification_capacity must be at least 1"));
    }

    Ok(())
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = load_config_from_str(r#"{ "version": "1.0" }"#).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.lifecycle.rewash_limit, 3);
        assert_eq!(config.display.rows_per_page, 10);
        assert!(config.lifecycle.record_discards);
    }

    #[test]
    fn test_load_full_config() {
        let config_json = r#"
        {
            "version": "1.0",
            "database_path": "/var/lib/uniwash/wash.db",
            "lifecycle": {
                "rewash_limit": 5,
                "washing_after_days": 2,
                "completed_after_days": 4,
                "record_discards": false
            },
            "display": { "rows_per_page": 25 },
            "cache": { "capacity": 50, "ttl_secs": 10 },
            "logging": { "level": "uniwash=debug", "json": true }
        }
        "#;

        let config = load_config_from_str(config_json).unwrap();
        assert_eq!(config.database_path.as_deref(), Some("/var/lib/uniwash/wash.db"));
        assert_eq!(config.lifecycle.rewash_limit, 5);
        assert!(!config.lifecycle.record_discards);
        assert_eq!(config.lifecycle.thresholds().completed_after_days, 4);
        assert_eq!(config.display.rows_per_page, 25);
        assert_eq!(config.display.history_rows_per_page, 10);
        assert_eq!(config.cache.capacity, 50);
        assert!(config.logging.json);
    }

    #[test]
    fn test_unsupported_version() {
        let err = load_config_from_str(r#"{ "version": "2.0" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_threshold_order_is_validated() {
        let config_json = r#"
        {
            "version": "1.0",
            "lifecycle": { "washing_after_days": 3, "completed_after_days": 1 }
        }
        "#;
        let err = load_config_from_str(config_json).unwrap_err();
        assert!(err.to_string().contains("completed_after_days"));
    }

    #[test]
    fn test_zero_rows_per_page_rejected() {
        let err =
            load_config_from_str(r#"{ "version": "1.0", "display": { "rows_per_page": 0 } }"#)
                .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let err = load_config_from_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::ParseJson(_)));
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert_eq!(load_or_default(&path).unwrap(), Config::default());
        assert!(matches!(
            load_config(&path).unwrap_err(),
            ConfigError::ReadFile { .. }
        ));

        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(br#"{ "version": "1.0", "notification_capacity": 8 }"#)
            .unwrap();
        assert_eq!(load_or_default(&path).unwrap().notification_capacity, 8);
    }
}
