//! Can Eye configuration.
//!
//! Loaded from `~/.can-eye/config.toml`. Every key is optional; a missing
//! file means defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Can Eye configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Who reports are filed as when `--as` and `CAN_EYE_USER` are absent.
    pub user: Option<String>,

    /// Storage root. Defaults to `~/.can-eye/data/`.
    pub data_dir: Option<PathBuf>,

    /// Radius for `location list --near`.
    pub search_radius_miles: f64,

    /// How failed report writes are retried.
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: None,
            data_dir: None,
            search_radius_miles: 5.0,
            retry: RetryPolicy::default(),
        }
    }
}

/// Attempts and linear backoff for saving a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 200,
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt number `attempt` (1-based; the first retry is 1).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_backoff_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Config {
    /// Load config from `~/.can-eye/config.toml`.
    /// Returns defaults if the file is missing, an error if it is invalid.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file. Missing means defaults.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        if !(config.search_radius_miles.is_finite() && config.search_radius_miles > 0.0) {
            return Err(format!(
                "search-radius-miles must be a positive number in {}",
                path.display()
            ));
        }
        if config.retry.max_attempts == 0 {
            return Err(format!(
                "retry.max-attempts must be at least 1 in {}",
                path.display()
            ));
        }

        Ok(config)
    }

    /// The config file path: `~/.can-eye/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".can-eye").join("config.toml"))
    }
}
