//! OS-specific pieces of the lock adapter.
//!
//! `fs4` maps to `flock(2)` on Unix and `LockFileEx` on Windows. The only
//! per-platform difference left for us is how "already locked" is reported.

use fs4::FileExt;
use std::fs::File;
use std::io;

/// Attempt to take an exclusive lock without blocking.
///
/// Returns `Ok(false)` when another handle holds the lock.
pub(super) fn try_lock_exclusive(file: &File) -> io::Result<bool> {
    match FileExt::try_lock_exclusive(file) {
        Ok(()) => Ok(true),
        Err(e) if is_contended(&e) => Ok(false),
        Err(e) => Err(e),
    }
}

pub(super) fn unlock(file: &File) -> io::Result<()> {
    FileExt::unlock(file)
}

#[cfg(windows)]
fn is_contended(err: &io::Error) -> bool {
    // ERROR_LOCK_VIOLATION
    err.kind() == io::ErrorKind::WouldBlock || err.raw_os_error() == Some(33)
}

#[cfg(not(windows))]
fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
}
