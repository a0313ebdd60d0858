//! Error types for claimchain.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Ownership and not-found outcomes of `release`/`complete` are not errors; they
//! surface as `Ok(false)` from the manager.

use crate::claims::BlockedConflict;
use crate::exit_codes;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for claimchain operations.
#[derive(Error, Debug)]
pub enum ClaimError {
    /// The requested files overlap a live chain owned by a different agent.
    #[error("{0}")]
    Blocked(Box<BlockedConflict>),

    /// The store's control file could not be locked in time.
    #[error(
        "timed out after {}ms waiting for lock '{}'",
        .waited.as_millis(),
        .path.display()
    )]
    LockTimeout { path: PathBuf, waited: Duration },

    /// Malformed caller input, rejected before any lock is taken.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The shared document exists but cannot be parsed.
    #[error("claim store is corrupt: {0}")]
    StoreCorrupt(String),

    /// Filesystem failure while reading or writing state.
    #[error("{0}")]
    Io(String),

    /// Configuration could not be read or failed validation.
    #[error("config error: {0}")]
    Config(String),
}

impl ClaimError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ClaimError::Blocked(_) => exit_codes::BLOCKED,
            ClaimError::LockTimeout { .. } => exit_codes::LOCK_FAILURE,
            ClaimError::InvalidInput(_) => exit_codes::USER_ERROR,
            ClaimError::Config(_) => exit_codes::USER_ERROR,
            ClaimError::StoreCorrupt(_) => exit_codes::STORE_FAILURE,
            ClaimError::Io(_) => exit_codes::STORE_FAILURE,
        }
    }

    /// The conflict details, if this is a blocked claim.
    pub fn as_blocked(&self) -> Option<&BlockedConflict> {
        match self {
            ClaimError::Blocked(conflict) => Some(conflict),
            _ => None,
        }
    }

    /// Whether the caller may reasonably retry the same call later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClaimError::Blocked(_) | ClaimError::LockTimeout { .. })
    }
}

impl From<BlockedConflict> for ClaimError {
    fn from(conflict: BlockedConflict) -> Self {
        ClaimError::Blocked(Box::new(conflict))
    }
}

/// Result type alias for claimchain operations.
pub type Result<T> = std::result::Result<T, ClaimError>;
