//! Configuration loading for ddns-sync.
//!
//! The config file is deliberately re-read at the start of every
//! reconciliation pass rather than cached, so edits take effect on the
//! next tick without a restart. The loaded value is immutable and passed
//! by reference through the pass.

use crate::error::{DdnsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
///
/// All fields are required; a file missing any of them counts as
/// "no config" and the pass is skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Domain whose zone is managed (e.g. "example.com").
    pub domain: String,

    /// Account email, sent as the `X-Auth-Email` header.
    pub email: String,

    /// API key, sent as the `X-Auth-Key` header.
    pub key: String,

    /// Interval between passes, in milliseconds.
    pub interval: u64,
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DdnsError::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("ddns-sync").join("config.json"))
    }

    /// Load configuration from a specific path.
    ///
    /// Any of the "no config" conditions (missing file, unreadable file,
    /// missing or empty field, zero interval) map to [`DdnsError::Config`].
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DdnsError::Config(format!(
                "Missing config file: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DdnsError::Config(format!("Could not read {}: {}", path.display(), e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| DdnsError::Config(format!("Invalid config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Check that no required field is empty.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("domain", &self.domain),
            ("email", &self.email),
            ("key", &self.key),
        ] {
            if value.trim().is_empty() {
                return Err(DdnsError::Config(format!("Field '{}' is empty", field)));
            }
        }

        if self.interval == 0 {
            return Err(DdnsError::Config("Field 'interval' must be > 0".to_string()));
        }

        Ok(())
    }

    /// Sleep interval between passes.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| DdnsError::Config(format!("Could not serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Generate example configuration.
    pub fn example() -> Self {
        Self {
            domain: "example.com".to_string(),
            email: "you@example.com".to_string(),
            key: "your-api-key".to_string(),
            interval: 600_000,
        }
    }
}
