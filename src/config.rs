//! Configuration file handling.
//!
//! Settings live in `config.toml` under the platform config directory (or the
//! file named by `TASKDECK_CONFIG`). Every section and key is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fields::SortKey;
use crate::store::DEFAULT_KEY;

pub const APP_NAME: &str = "taskdeck";
pub const CONFIG_ENV: &str = "TASKDECK_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the key-value files. Defaults to the platform data
    /// directory.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_key(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_completed: bool,
    #[serde(default)]
    pub sort: SortKey,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_completed: true,
            sort: SortKey::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_true() -> bool { true }
fn default_key() -> String { DEFAULT_KEY.to_string() }
fn default_log_filter() -> String { format!("{APP_NAME}=warn") }

impl Config {
    /// Default config file location, honouring `TASKDECK_CONFIG`.
    pub fn config_path() -> Option<PathBuf> {
        if let Some(p) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(p));
        }
        dirs::config_dir().map(|d| d.join(APP_NAME).join("config.toml"))
    }

    /// Load from the default location. A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Directory for task data: the configured one, else the platform data
    /// directory, else `./.taskdeck`.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_NAME)))
            .unwrap_or_else(|| PathBuf::from(format!(".{APP_NAME}")))
    }

    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.storage.key, "tasks");
        assert!(cfg.display.show_completed);
        assert_eq!(cfg.log.filter, "taskdeck=warn");
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[storage]\ndir = \"/tmp/td\"\n\n[display]\nsort = \"priority\"\n",
        )
        .unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.data_dir(), PathBuf::from("/tmp/td"));
        assert_eq!(cfg.storage.key, "tasks");
        assert_eq!(cfg.display.sort, SortKey::Priority);
        assert!(cfg.display.show_completed);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage\nkey = ").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut cfg = Config::default();
        cfg.storage.key = "work".into();
        cfg.display.show_completed = false;
        let back: Config = toml::from_str(&cfg.to_toml()).unwrap();
        assert_eq!(back, cfg);
    }
}
