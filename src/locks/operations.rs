//! Lock acquisition and status probing.

use super::backoff::{Backoff, BackoffPolicy};
use super::guard::LockGuard;
use super::metadata::LockMetadata;
use super::platform;
use super::types::LockInfo;
use crate::error::{ClaimError, Result};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How long to wait for a lock and how to pace retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockSettings {
    /// Upper bound on time spent acquiring. Zero means a single attempt.
    pub timeout: Duration,
    pub backoff: BackoffPolicy,
}

impl LockSettings {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            backoff: BackoffPolicy::default(),
        }
    }
}

fn open_control_file(control_path: &Path) -> Result<File> {
    if let Some(parent) = control_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            ClaimError::Io(format!(
                "failed to create lock directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(control_path)
        .map_err(|e| {
            ClaimError::Io(format!(
                "failed to open lock file '{}': {}",
                control_path.display(),
                e
            ))
        })
}

/// Acquire an exclusive lock on `control_path`, waiting up to `settings.timeout`.
///
/// # Returns
///
/// * `Ok(LockGuard)` - Lock held until the guard is dropped
/// * `Err(ClaimError::LockTimeout)` - Another holder kept the lock past the timeout
/// * `Err(ClaimError::Io)` - The control file could not be opened or locked
pub fn acquire_exclusive(
    control_path: &Path,
    settings: &LockSettings,
    action: &str,
) -> Result<LockGuard> {
    let file = open_control_file(control_path)?;
    let started = Instant::now();
    let mut backoff = Backoff::new(settings.backoff);

    loop {
        let acquired = platform::try_lock_exclusive(&file).map_err(|e| {
            ClaimError::Io(format!(
                "failed to lock '{}': {}",
                control_path.display(),
                e
            ))
        })?;

        if acquired {
            if backoff.attempts() > 0 {
                debug!(
                    path = %control_path.display(),
                    retries = backoff.attempts(),
                    waited_ms = started.elapsed().as_millis() as u64,
                    "acquired contended lock"
                );
            }
            if let Err(e) = LockMetadata::new(action).write_to(&file) {
                warn!(path = %control_path.display(), error = %e, "could not record lock holder");
            }
            return Ok(LockGuard::new(control_path.to_path_buf(), file));
        }

        let elapsed = started.elapsed();
        if elapsed >= settings.timeout {
            return Err(ClaimError::LockTimeout {
                path: control_path.to_path_buf(),
                waited: elapsed,
            });
        }

        let delay = backoff.next_delay().min(settings.timeout - elapsed);
        thread::sleep(delay);
    }
}

/// Run `body` while holding an exclusive lock on `control_path`.
///
/// The lock is released on every exit path: normal return, error return, or
/// panic unwinding out of `body`.
pub fn with_exclusive_lock<T, F>(control_path: &Path, timeout: Duration, body: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    with_exclusive_lock_using(control_path, &LockSettings::with_timeout(timeout), "lock", body)
}

/// Like [`with_exclusive_lock`] with explicit backoff settings and an action
/// label recorded in the lock metadata.
pub fn with_exclusive_lock_using<T, F>(
    control_path: &Path,
    settings: &LockSettings,
    action: &str,
    body: F,
) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let _guard = acquire_exclusive(control_path, settings, action)?;
    body()
}

/// Probe whether `control_path` is currently locked by someone else.
///
/// A free lock is taken and immediately released during the probe.
pub fn lock_status(control_path: &Path, stale_seconds: u64) -> Result<LockInfo> {
    if !control_path.exists() {
        return Ok(LockInfo {
            path: control_path.to_path_buf(),
            held: false,
            metadata: None,
            is_stale: false,
        });
    }

    let file = open_control_file(control_path)?;
    let acquired = platform::try_lock_exclusive(&file).map_err(|e| {
        ClaimError::Io(format!(
            "failed to probe lock '{}': {}",
            control_path.display(),
            e
        ))
    })?;

    if acquired {
        drop(LockGuard::new(control_path.to_path_buf(), file));
    }

    let held = !acquired;
    let metadata = LockMetadata::from_file(control_path).ok();
    let is_stale = held
        && metadata
            .as_ref()
            .is_some_and(|meta| meta.is_stale(stale_seconds));

    Ok(LockInfo {
        path: control_path.to_path_buf(),
        held,
        metadata,
        is_stale,
    })
}
