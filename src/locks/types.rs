//! Lock status information.

use super::metadata::LockMetadata;
use std::path::PathBuf;

/// Snapshot of a control file's lock state.
#[derive(Debug, Clone)]
pub struct LockInfo {
    /// The control file path.
    pub path: PathBuf,

    /// Whether another handle held the lock when probed.
    pub held: bool,

    /// Metadata written by the current (or most recent) holder, if readable.
    pub metadata: Option<LockMetadata>,

    /// Whether a held lock has exceeded the staleness threshold.
    pub is_stale: bool,
}

impl std::fmt::Display for LockInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.held { "held" } else { "free" };
        match (&self.metadata, self.held) {
            (Some(meta), true) => write!(
                f,
                "{} {} (owner: {}, age: {}, action: {}{})",
                self.path.display(),
                state,
                meta.owner,
                meta.age_string(),
                meta.action,
                if self.is_stale { ", STALE" } else { "" }
            ),
            _ => write!(f, "{} {}", self.path.display(), state),
        }
    }
}
