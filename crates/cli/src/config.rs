//! Node configuration persisted in the data directory.

use anyhow::{Context, Result};
use didapp_app::AppConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = "config.json";
const DB_DIR: &str = "db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Default log filter when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Flush storage after every commit.
    #[serde(default = "default_flush")]
    pub flush_on_commit: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_flush() -> bool {
    true
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            flush_on_commit: default_flush(),
        }
    }
}

impl NodeConfig {
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Where the sled database lives inside the data directory.
    pub fn db_path(data_dir: &Path) -> PathBuf {
        data_dir.join(DB_DIR)
    }

    /// Load the config, falling back to defaults if the file is missing.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = Self::path(data_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn save(&self, data_dir: &Path) -> Result<PathBuf> {
        let path = Self::path(data_dir);
        fs::write(&path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(path)
    }

    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            flush_on_commit: self.flush_on_commit,
        }
    }
}

/// Install the log subscriber. RUST_LOG wins over the configured level.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(NodeConfig::load(dir.path()).unwrap(), NodeConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = NodeConfig {
            log_level: "debug".into(),
            flush_on_commit: false,
        };
        config.save(dir.path()).unwrap();

        let loaded = NodeConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
        assert!(!loaded.app_config().flush_on_commit);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(NodeConfig::path(dir.path()), r#"{"log_level":"warn"}"#).unwrap();

        let loaded = NodeConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.log_level, "warn");
        assert!(loaded.flush_on_commit);
    }
}
