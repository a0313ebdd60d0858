//! Platform lock adapter for claimchain.
//!
//! Every read or write of the shared claim document happens inside
//! [`with_exclusive_lock`], which brackets the critical section with an
//! OS-level exclusive lock on a sibling control file.
//!
//! # Lock Files
//!
//! The control file (`chains.lock` by default) is created on demand and is
//! locked with `flock(2)` on Unix and `LockFileEx` on Windows (through `fs4`).
//! Locks belong to the open file handle, so two threads of the same process
//! contend exactly like two separate processes do.
//!
//! # Acquisition
//!
//! Acquisition is a sequence of non-blocking attempts separated by
//! exponential backoff with random jitter, bounded by the caller's timeout.
//! Expiry of the timeout yields [`ClaimError::LockTimeout`].
//!
//! # Lock Metadata
//!
//! The holder writes JSON metadata (`owner`, `pid`, `created_at`, `action`)
//! into the control file on a best-effort basis, which `lock status` reads
//! back for diagnostics.
//!
//! # RAII Guards
//!
//! The lock is released when the [`LockGuard`] is dropped, on every exit path
//! including unwinding. If unlocking fails during drop, a warning is logged.
//!
//! [`ClaimError::LockTimeout`]: crate::error::ClaimError::LockTimeout

mod backoff;
mod guard;
mod metadata;
mod operations;
mod platform;
mod types;


pub use backoff::{Backoff, BackoffPolicy};
pub use guard::LockGuard;
pub use metadata::LockMetadata;
pub(crate) use metadata::get_owner_string;
pub use operations::{
    LockSettings, acquire_exclusive, lock_status, with_exclusive_lock, with_exclusive_lock_using,
};
pub use types::LockInfo;
