//! Default values for the Config struct.

// Default value functions for serde
pub(crate) fn default_lock_timeout_ms() -> u64 {
    10_000
}
pub(crate) fn default_backoff_base_ms() -> u64 {
    10
}
pub(crate) fn default_backoff_max_ms() -> u64 {
    500
}
pub(crate) fn default_ttl_seconds() -> u64 {
    3600
}
pub(crate) fn default_retention_seconds() -> u64 {
    86_400
}
pub(crate) fn default_lock_stale_seconds() -> u64 {
    60
}
