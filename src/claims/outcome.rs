//! Tagged result of a claim attempt.

use super::conflict::BlockedConflict;
use crate::chain::ClaimChain;
use crate::error::{ClaimError, Result};

/// Outcome of [`ClaimManager::try_claim`](super::ClaimManager::try_claim).
///
/// Lock timeouts and other failures stay in the surrounding `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed(ClaimChain),
    Blocked(BlockedConflict),
}

impl ClaimOutcome {
    pub fn is_claimed(&self) -> bool {
        matches!(self, ClaimOutcome::Claimed(_))
    }

    pub fn chain(&self) -> Option<&ClaimChain> {
        match self {
            ClaimOutcome::Claimed(chain) => Some(chain),
            ClaimOutcome::Blocked(_) => None,
        }
    }

    /// Convert a blocked outcome into [`ClaimError::Blocked`].
    pub fn into_result(self) -> Result<ClaimChain> {
        match self {
            ClaimOutcome::Claimed(chain) => Ok(chain),
            ClaimOutcome::Blocked(conflict) => Err(ClaimError::from(conflict)),
        }
    }

    /// Split a claim result into an outcome, passing through non-blocking errors.
    pub fn from_claim_result(result: Result<ClaimChain>) -> Result<Self> {
        match result {
            Ok(chain) => Ok(ClaimOutcome::Claimed(chain)),
            Err(ClaimError::Blocked(conflict)) => Ok(ClaimOutcome::Blocked(*conflict)),
            Err(e) => Err(e),
        }
    }
}
