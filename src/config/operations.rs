//! Config loading, validation, and conversion into runtime settings.

use super::model::Config;
use crate::error::{ClaimError, Result};
use crate::locks::{BackoffPolicy, LockSettings};
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(ClaimError::Config)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ClaimError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from a YAML file, falling back to defaults if it does not exist.
    ///
    /// A file that exists but is invalid is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::metadata(path) {
            Ok(_) => Self::load(path),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ClaimError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file means all defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| ClaimError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ClaimError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `lock_timeout_ms`, `backoff_base_ms`, `default_ttl_seconds` must be positive
    /// - `backoff_max_ms` must be at least `backoff_base_ms`
    /// - `retention_seconds` may be zero (prune on next write)
    pub fn validate(&self) -> Result<()> {
        if self.lock_timeout_ms == 0 {
            return Err(ClaimError::Config(
                "config validation failed: lock_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.backoff_base_ms == 0 {
            return Err(ClaimError::Config(
                "config validation failed: backoff_base_ms must be greater than 0".to_string(),
            ));
        }

        if self.backoff_max_ms < self.backoff_base_ms {
            return Err(ClaimError::Config(format!(
                "config validation failed: backoff_max_ms ({}) must be at least backoff_base_ms ({})",
                self.backoff_max_ms, self.backoff_base_ms
            )));
        }

        if self.default_ttl_seconds == 0 {
            return Err(ClaimError::Config(
                "config validation failed: default_ttl_seconds must be greater than 0".to_string(),
            ));
        }

        if i64::try_from(self.retention_seconds).is_err() {
            return Err(ClaimError::Config(
                "config validation failed: retention_seconds is too large".to_string(),
            ));
        }

        Ok(())
    }

    /// Lock timeout and backoff pacing for the store lock.
    pub fn lock_settings(&self) -> LockSettings {
        LockSettings {
            timeout: Duration::from_millis(self.lock_timeout_ms),
            backoff: BackoffPolicy {
                base: Duration::from_millis(self.backoff_base_ms),
                max: Duration::from_millis(self.backoff_max_ms),
            },
        }
    }

    /// Retention window for dormant records.
    pub fn retention(&self) -> chrono::Duration {
        i64::try_from(self.retention_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}
