//! RAII lock guard implementation.

use super::platform;
use crate::error::{ClaimError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::warn;

/// RAII guard for an exclusive lock on a control file.
///
/// When dropped, the OS lock is released. If unlocking fails, a warning is
/// logged; closing the handle releases the lock regardless.
#[derive(Debug)]
pub struct LockGuard {
    /// Path to the control file.
    path: PathBuf,

    /// The locked handle. Dropping it closes the descriptor.
    file: File,

    /// Whether the lock has been released manually.
    released: bool,
}

impl LockGuard {
    pub(super) fn new(path: PathBuf, file: File) -> Self {
        Self {
            path,
            file,
            released: false,
        }
    }

    /// Get the path to the control file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Manually release the lock, surfacing unlock errors to the caller.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        platform::unlock(&self.file).map_err(|e| {
            ClaimError::Io(format!(
                "failed to release lock '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = platform::unlock(&self.file)
        {
            warn!(path = %self.path.display(), error = %e, "failed to release lock");
        }
    }
}
