//! Collision detection between a claim request and live chains.

use crate::chain::ClaimChain;
use serde::Serialize;
use std::collections::BTreeSet;

/// Why a claim was refused: the chains in the way and the contested files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockedConflict {
    /// Live chains owned by other agents that intersect the request.
    pub blocking_chains: Vec<ClaimChain>,

    /// Union of the requested files held by `blocking_chains`.
    pub conflicting_files: BTreeSet<String>,
}

impl BlockedConflict {
    /// Distinct owners of the blocking chains.
    pub fn blocking_agents(&self) -> BTreeSet<&str> {
        self.blocking_chains
            .iter()
            .map(|chain| chain.agent_id.as_str())
            .collect()
    }
}

impl std::fmt::Display for BlockedConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let files: Vec<&str> = self.conflicting_files.iter().map(String::as_str).collect();
        let agents: Vec<&str> = self.blocking_agents().into_iter().collect();
        write!(
            f,
            "claim blocked: {} held by {} ({} chain{})",
            files.join(", "),
            agents.join(", "),
            self.blocking_chains.len(),
            if self.blocking_chains.len() == 1 { "" } else { "s" }
        )
    }
}

/// Find live chains of other agents that intersect `files`.
///
/// `live` must already be filtered to active, unexpired chains. Chains owned
/// by `agent_id` never conflict, so an agent can hold overlapping chains.
pub fn find_conflicts<'a, I>(
    live: I,
    agent_id: &str,
    files: &BTreeSet<String>,
) -> Option<BlockedConflict>
where
    I: IntoIterator<Item = &'a ClaimChain>,
{
    if files.is_empty() {
        return None;
    }

    let mut blocking_chains = Vec::new();
    let mut conflicting_files = BTreeSet::new();

    for chain in live {
        if chain.agent_id == agent_id {
            continue;
        }
        let overlap = chain.overlap(files);
        if overlap.is_empty() {
            continue;
        }
        conflicting_files.extend(overlap);
        blocking_chains.push(chain.clone());
    }

    if blocking_chains.is_empty() {
        None
    } else {
        Some(BlockedConflict {
            blocking_chains,
            conflicting_files,
        })
    }
}
