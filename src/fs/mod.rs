//! Filesystem utilities for claimchain.
//!
//! Atomic writes keep the shared claim document intact across crashes.

pub mod atomic;

pub use atomic::atomic_write;
pub use atomic::atomic_write_file;
