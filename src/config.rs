//! Configuration Management
//!
//! Handles persistent configuration storage for the reconciler: the remote
//! endpoint, the API key, and the read-back retry budget.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default number of read-back poll attempts after a mutation.
pub const DEFAULT_READ_BACK_ATTEMPTS: u32 = 5;

/// Default delay between read-back polls, in seconds.
pub const DEFAULT_READ_BACK_DELAY_SECS: u64 = 2;

/// Reconciler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Base URL of the remote API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key sent with every request
    #[serde(default)]
    pub api_key: Option<String>,
    /// Read-back poll attempts before an apply is reported unconfirmed
    #[serde(default = "default_read_back_attempts")]
    pub read_back_attempts: u32,
    /// Seconds slept between read-back polls
    #[serde(default = "default_read_back_delay_secs")]
    pub read_back_delay_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.cloudlink.example.com".to_string()
}

fn default_read_back_attempts() -> u32 {
    DEFAULT_READ_BACK_ATTEMPTS
}

fn default_read_back_delay_secs() -> u64 {
    DEFAULT_READ_BACK_DELAY_SECS
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            read_back_attempts: DEFAULT_READ_BACK_ATTEMPTS,
            read_back_delay_secs: DEFAULT_READ_BACK_DELAY_SECS,
        }
    }
}

impl ReconcilerConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cloudlink").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| crate::error::Error::Config(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| crate::error::Error::Config(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| crate::error::Error::Config(e.to_string()))?;

        Ok(())
    }

    /// Convergence knobs derived from this config
    pub fn convergence_settings(&self) -> ConvergenceSettings {
        ConvergenceSettings {
            read_back_attempts: self.read_back_attempts,
            read_back_delay: Duration::from_secs(self.read_back_delay_secs),
        }
    }
}

/// Bounded-retry settings for the post-mutation read-back loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergenceSettings {
    pub read_back_attempts: u32,
    pub read_back_delay: Duration,
}

impl Default for ConvergenceSettings {
    fn default() -> Self {
        ReconcilerConfig::default().convergence_settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_bounded() {
        let settings = ConvergenceSettings::default();
        assert!(settings.read_back_attempts >= 1);
        assert!(settings.read_back_delay > Duration::ZERO);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: ReconcilerConfig =
            serde_json::from_str(r#"{"endpoint": "https://api.test"}"#).unwrap();
        assert_eq!(config.endpoint, "https://api.test");
        assert_eq!(config.read_back_attempts, DEFAULT_READ_BACK_ATTEMPTS);
        assert_eq!(config.api_key, None);
    }
}
