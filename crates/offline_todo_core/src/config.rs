//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults.
//! - Set-but-invalid variables are rejected, never silently replaced.
//! - Resolution does not log; it runs before the logger is started.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "OFFLINE_TODO_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "OFFLINE_TODO_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "OFFLINE_TODO_LOG_DIR";
pub const ENV_ONLINE: &str = "OFFLINE_TODO_ONLINE";
pub const ENV_AYAHS_PATH: &str = "OFFLINE_TODO_AYAHS";
pub const ENV_QURAN_META_PATH: &str = "OFFLINE_TODO_QURAN_META";

const DEFAULT_DB_FILE_NAME: &str = "offline_todo.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "offline_todo_logs";
const DEFAULT_AYAHS_PATH: &str = "data/ayahs.json";
const DEFAULT_QURAN_META_PATH: &str = "data/quran-meta.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid {key} value `{value}`; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Key-value store database file.
    pub db_path: PathBuf,
    /// Normalized log level (`trace|debug|info|warn|error`).
    pub log_level: String,
    /// Absolute log directory.
    pub log_dir: PathBuf,
    /// Connectivity reported before the first platform event.
    pub assume_online: bool,
    pub ayahs_path: PathBuf,
    pub quran_meta_path: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let temp_dir = std::env::temp_dir();
        Self {
            db_path: temp_dir.join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: temp_dir.join(DEFAULT_LOG_DIR_NAME),
            assume_online: true,
            ayahs_path: PathBuf::from(DEFAULT_AYAHS_PATH),
            quran_meta_path: PathBuf::from(DEFAULT_QURAN_META_PATH),
        }
    }
}

impl CoreConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &'static str| -> Option<String> {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(value) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&value)
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_LOG_LEVEL,
                    value: value.clone(),
                    expected: "trace|debug|info|warn|error",
                })?
                .to_string();
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_ONLINE) {
            config.assume_online = parse_bool(&value).ok_or(ConfigError::InvalidValue {
                key: ENV_ONLINE,
                value,
                expected: "true|false",
            })?;
        }
        if let Some(value) = read(ENV_AYAHS_PATH) {
            config.ayahs_path = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_QURAN_META_PATH) {
            config.quran_meta_path = PathBuf::from(value);
        }
        Ok(config)
    }

    /// `key=value` fields for the startup log line.
    ///
    /// Resolution runs before the logger exists, so callers log this once
    /// logging is up.
    pub fn log_fields(&self) -> String {
        format!(
            "db_path={} log_level={} log_dir={} online={} ayahs={} quran_meta={}",
            self.db_path.display(),
            self.log_level,
            self.log_dir.display(),
            self.assume_online,
            self.ayahs_path.display(),
            self.quran_meta_path.display()
        )
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ENV_DB_PATH, ENV_LOG_LEVEL, ENV_ONLINE};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(config.assume_online);
    }

    #[test]
    fn overrides_are_trimmed_and_normalized() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, " /var/lib/todo.sqlite3 "),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_ONLINE, "off"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/todo.sqlite3"));
        assert_eq!(config.log_level, "warn");
        assert!(!config.assume_online);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = CoreConfig::from_lookup(lookup_from(&[(ENV_ONLINE, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == ENV_ONLINE));

        let err = CoreConfig::from_lookup(lookup_from(&[(ENV_LOG_LEVEL, "verbose")])).unwrap_err();
        assert!(err.to_string().contains(ENV_LOG_LEVEL));
    }

    #[test]
    fn log_fields_carry_resolved_values_on_one_line() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/data/todo.sqlite3"),
            (ENV_ONLINE, "false"),
        ]))
        .unwrap();
        let fields = config.log_fields();

        assert!(fields.contains("db_path=/data/todo.sqlite3"));
        assert!(fields.contains("online=false"));
        assert!(fields.contains("ayahs=data/ayahs.json"));
        assert!(!fields.contains('\n'));
    }
}
