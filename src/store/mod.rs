//! The shared claim document and its guarded transactions.
//!
//! The store owns exactly one JSON document holding every retained chain.
//! Every read and every write happens inside the lock adapter's exclusive
//! section, and writes replace the document atomically. Nothing is cached
//! between calls: each operation reloads the document, since another process
//! may have committed in the meantime.

mod document;
mod expiry;
mod transaction;


pub use document::{ClaimDocument, DOCUMENT_VERSION};
pub use expiry::{live_chains, partition_live, prune_dormant};
pub use transaction::Transaction;

use crate::chain::ClaimChain;
use crate::config::Config;
use crate::context::ClaimContext;
use crate::error::Result;
use crate::events::EventLog;
use crate::locks::{LockSettings, with_exclusive_lock_using};
use chrono::{Duration, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Lock pacing and retention for a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSettings {
    pub lock: LockSettings,

    /// How long dormant records stay resolvable before pruning.
    pub retention: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl StoreSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            lock: config.lock_settings(),
            retention: config.retention(),
        }
    }
}

/// Handle to the shared claim document.
#[derive(Debug, Clone)]
pub struct ClaimStore {
    document_path: PathBuf,
    lock_path: PathBuf,
    settings: StoreSettings,
    events: Option<EventLog>,
}

impl ClaimStore {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(
        document_path: P,
        lock_path: Q,
        settings: StoreSettings,
    ) -> Self {
        Self {
            document_path: document_path.into(),
            lock_path: lock_path.into(),
            settings,
            events: None,
        }
    }

    /// Store for a resolved state directory, with its audit log attached.
    pub fn open(ctx: &ClaimContext, config: &Config) -> Self {
        Self::new(
            ctx.document_path(),
            ctx.lock_path(),
            StoreSettings::from_config(config),
        )
        .with_events(EventLog::new(ctx.events_path()))
    }

    /// Attach an audit log; committed transactions append their staged events.
    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn events(&self) -> Option<&EventLog> {
        self.events.as_ref()
    }

    /// Live chains: active and unexpired at the time of the read.
    pub fn read_snapshot(&self) -> Result<Vec<ClaimChain>> {
        with_exclusive_lock_using(&self.lock_path, &self.settings.lock, "read", || {
            let document = ClaimDocument::load(&self.document_path)?;
            Ok(live_chains(&document.chains, Utc::now()))
        })
    }

    /// Every retained record, including terminal and expired ones.
    pub fn read_all(&self) -> Result<Vec<ClaimChain>> {
        with_exclusive_lock_using(&self.lock_path, &self.settings.lock, "read", || {
            Ok(ClaimDocument::load(&self.document_path)?.chains)
        })
    }

    /// Run `mutator` against the live view and persist its changes.
    ///
    /// If the mutator returns `Err`, or never mutates the view, the document is
    /// not touched. On a write, dormant records past retention are pruned and
    /// staged events are appended while the lock is still held.
    pub fn write_transaction<T, F>(&self, action: &str, mutator: F) -> Result<T>
    where
        F: FnOnce(&mut Transaction) -> Result<T>,
    {
        with_exclusive_lock_using(&self.lock_path, &self.settings.lock, action, || {
            let now = Utc::now();
            let document = ClaimDocument::load(&self.document_path)?;
            let (live, dormant) = partition_live(document.chains, now);

            let mut tx = Transaction::new(now, live);
            let value = mutator(&mut tx)?;

            if !tx.is_dirty() {
                return Ok(value);
            }

            let (live, events) = tx.into_parts();
            let dormant_before = dormant.len();
            let mut chains = prune_dormant(dormant, now, self.settings.retention);
            let pruned = dormant_before - chains.len();
            chains.extend(live);
            chains.sort_by_key(|chain| chain.claimed_at);

            ClaimDocument::new(chains).save(&self.document_path)?;
            debug!(action, pruned, path = %self.document_path.display(), "committed claim store");

            if let Some(log) = &self.events {
                for event in &events {
                    if let Err(e) = log.append(event) {
                        warn!(action = %event.action, error = %e, "failed to append audit event");
                    }
                }
            }

            Ok(value)
        })
    }
}
