//! Claim chain manager: the public coordination API.
//!
//! Agents reserve sets of paths with [`ClaimManager::claim`], give them back
//! with [`ClaimManager::release`] or [`ClaimManager::complete`], and inspect
//! reservations with [`ClaimManager::lookup`] and [`ClaimManager::list_active`].
//!
//! # Rules
//!
//! - A claim reserves every requested path or none of them.
//! - Live chains of *other* agents block intersecting claims; an agent's own
//!   chains never block it.
//! - Releasing or completing a chain that is missing, already finished,
//!   expired, or owned by someone else is `Ok(false)`, not an error.
//! - Nothing here retries. A blocked caller gets [`ClaimError::Blocked`] with
//!   enough detail to schedule its own retry.
//!
//! Every call runs inside the store's exclusive lock, so each operation sees
//! exactly the committed result of every earlier one.

mod conflict;
mod outcome;
mod paths;


pub use conflict::{BlockedConflict, find_conflicts};
pub use outcome::ClaimOutcome;
pub use paths::{canonicalize_files, canonicalize_path};

use crate::chain::{ChainStatus, ClaimChain};
use crate::config::Config;
use crate::context::ClaimContext;
use crate::error::{ClaimError, Result};
use crate::events::{Event, EventAction};
use crate::store::ClaimStore;
use serde_json::json;
use tracing::{debug, warn};

/// Entry point for claiming and releasing resources.
#[derive(Debug, Clone)]
pub struct ClaimManager {
    store: ClaimStore,
}

impl ClaimManager {
    pub fn new(store: ClaimStore) -> Self {
        Self { store }
    }

    /// Manager over the state directory described by `ctx`.
    pub fn open(ctx: &ClaimContext, config: &Config) -> Self {
        Self::new(ClaimStore::open(ctx, config))
    }

    pub fn store(&self) -> &ClaimStore {
        &self.store
    }

    /// Reserve `files` for `agent_id` for `ttl_seconds`.
    ///
    /// # Returns
    ///
    /// * `Ok(ClaimChain)` - The new chain, committed and visible to every reader
    /// * `Err(ClaimError::Blocked)` - Another agent holds some of the files; nothing was reserved
    /// * `Err(ClaimError::InvalidInput)` - Rejected before taking the lock
    /// * `Err(ClaimError::LockTimeout)` - The store lock was not acquired in time
    pub fn claim<I, S>(&self, agent_id: &str, files: I, ttl_seconds: u64) -> Result<ClaimChain>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        validate_agent_id(agent_id)?;
        if ttl_seconds == 0 {
            return Err(ClaimError::InvalidInput(
                "ttl_seconds must be greater than 0".to_string(),
            ));
        }
        let files = canonicalize_files(files)?;

        let result = self.store.write_transaction("claim", |tx| {
            if let Some(conflict) = find_conflicts(tx.chains(), agent_id, &files) {
                // Staged events are dropped on abort; append under the lock.
                self.record_blocked(agent_id, &files, &conflict);
                return Err(ClaimError::from(conflict));
            }

            let chain = ClaimChain::new(agent_id, files.clone(), ttl_seconds, tx.now());
            tx.record(
                Event::new(EventAction::Claim, agent_id)
                    .with_chain(&chain.chain_id)
                    .with_details(json!({
                        "files": &chain.files,
                        "ttl_seconds": ttl_seconds,
                    })),
            );
            tx.push(chain.clone());
            Ok(chain)
        });

        if let Ok(chain) = &result {
            debug!(
                agent_id,
                chain_id = %chain.chain_id,
                files = chain.files.len(),
                "claimed"
            );
        }

        result
    }

    /// Like [`claim`](Self::claim), but reports a conflict as
    /// [`ClaimOutcome::Blocked`] instead of an error.
    pub fn try_claim<I, S>(
        &self,
        agent_id: &str,
        files: I,
        ttl_seconds: u64,
    ) -> Result<ClaimOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ClaimOutcome::from_claim_result(self.claim(agent_id, files, ttl_seconds))
    }

    /// Give up a chain without finishing its work.
    ///
    /// Returns `Ok(false)` if the chain is unknown, no longer live, or owned by
    /// a different agent.
    pub fn release(&self, chain_id: &str, agent_id: &str) -> Result<bool> {
        self.finish(chain_id, agent_id, ChainStatus::Released)
    }

    /// Mark a chain's work as done. Same contract as [`release`](Self::release).
    pub fn complete(&self, chain_id: &str, agent_id: &str) -> Result<bool> {
        self.finish(chain_id, agent_id, ChainStatus::Completed)
    }

    fn finish(&self, chain_id: &str, agent_id: &str, status: ChainStatus) -> Result<bool> {
        validate_agent_id(agent_id)?;

        let action = match status {
            ChainStatus::Completed => EventAction::Complete,
            _ => EventAction::Release,
        };

        let finished = self
            .store
            .write_transaction(status.as_str(), |tx| {
                let owned = tx
                    .find(chain_id)
                    .is_some_and(|chain| chain.agent_id == agent_id);
                if !owned {
                    return Ok(false);
                }

                let now = tx.now();
                let Some(chain) = tx.find_mut(chain_id) else {
                    return Ok(false);
                };
                chain.finish(status, now);
                let details = json!({ "files": &chain.files });

                tx.record(
                    Event::new(action, agent_id)
                        .with_chain(chain_id)
                        .with_details(details),
                );
                Ok(true)
            })?;

        debug!(chain_id, agent_id, status = %status, finished, "finish chain");
        Ok(finished)
    }

    /// The first live chain holding `file`, from any agent.
    ///
    /// A blank path is never held, so it resolves to `None`.
    pub fn lookup(&self, file: &str) -> Result<Option<ClaimChain>> {
        if file.trim().is_empty() {
            return Ok(None);
        }
        let file = canonicalize_path(file)?;
        Ok(self
            .store
            .read_snapshot()?
            .into_iter()
            .find(|chain| chain.holds(&file)))
    }

    /// Every live chain.
    pub fn list_active(&self) -> Result<Vec<ClaimChain>> {
        self.store.read_snapshot()
    }

    /// Live chains owned by `agent_id`.
    pub fn list_for_agent(&self, agent_id: &str) -> Result<Vec<ClaimChain>> {
        Ok(self
            .store
            .read_snapshot()?
            .into_iter()
            .filter(|chain| chain.agent_id == agent_id)
            .collect())
    }

    /// Any retained record by id, including released, completed, and expired
    /// ones. `None` once the record has been pruned or never existed.
    pub fn get(&self, chain_id: &str) -> Result<Option<ClaimChain>> {
        Ok(self
            .store
            .read_all()?
            .into_iter()
            .find(|chain| chain.chain_id == chain_id))
    }

    fn record_blocked(
        &self,
        agent_id: &str,
        files: &std::collections::BTreeSet<String>,
        conflict: &BlockedConflict,
    ) {
        debug!(
            agent_id,
            conflicting = conflict.conflicting_files.len(),
            "claim blocked"
        );

        let Some(log) = self.store.events() else {
            return;
        };
        let blocking: Vec<&str> = conflict
            .blocking_chains
            .iter()
            .map(|chain| chain.chain_id.as_str())
            .collect();
        let event = Event::new(EventAction::Blocked, agent_id).with_details(json!({
            "files": files,
            "conflicting_files": &conflict.conflicting_files,
            "blocking_chains": blocking,
        }));
        if let Err(e) = log.append(&event) {
            warn!(error = %e, "failed to append audit event");
        }
    }
}

fn validate_agent_id(agent_id: &str) -> Result<()> {
    if agent_id.trim().is_empty() {
        return Err(ClaimError::InvalidInput(
            "agent_id must not be empty".to_string(),
        ));
    }
    Ok(())
}
