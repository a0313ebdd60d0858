//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for a claim store.
///
/// This struct represents the contents of `config.yaml` in the state directory.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Lock settings
    // =========================================================================
    /// Milliseconds to wait for the store lock before giving up.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    /// First retry delay ceiling in milliseconds; doubles per attempt.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Cap on any single retry delay in milliseconds.
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,

    /// Seconds after which a held lock is reported as stale by `lock status`.
    #[serde(default = "default_lock_stale_seconds")]
    pub lock_stale_seconds: u64,

    // =========================================================================
    // Chain settings
    // =========================================================================
    /// TTL applied by the CLI when `--ttl` is not given.
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,

    /// Seconds a released, completed, or expired chain stays resolvable by id.
    #[serde(default = "default_retention_seconds")]
    pub retention_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout_ms(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            lock_stale_seconds: default_lock_stale_seconds(),
            default_ttl_seconds: default_ttl_seconds(),
            retention_seconds: default_retention_seconds(),
        }
    }
}
