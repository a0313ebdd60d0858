//! The mutable view handed to a write transaction.

use crate::chain::ClaimChain;
use crate::events::Event;
use chrono::{DateTime, Utc};

/// Live chains at the start of a write, plus staged audit events.
///
/// Only mutations made through this type mark the transaction dirty; a
/// transaction that never mutates is not written back.
#[derive(Debug)]
pub struct Transaction {
    now: DateTime<Utc>,
    live: Vec<ClaimChain>,
    events: Vec<Event>,
    dirty: bool,
}

impl Transaction {
    pub(super) fn new(now: DateTime<Utc>, live: Vec<ClaimChain>) -> Self {
        Self {
            now,
            live,
            events: Vec::new(),
            dirty: false,
        }
    }

    /// The instant the transaction observed the document.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Active, unexpired chains.
    pub fn chains(&self) -> &[ClaimChain] {
        &self.live
    }

    pub fn find(&self, chain_id: &str) -> Option<&ClaimChain> {
        self.live.iter().find(|chain| chain.chain_id == chain_id)
    }

    /// Mutable access to one chain. Marks the transaction dirty if found.
    pub fn find_mut(&mut self, chain_id: &str) -> Option<&mut ClaimChain> {
        let chain = self.live.iter_mut().find(|chain| chain.chain_id == chain_id);
        if chain.is_some() {
            self.dirty = true;
        }
        chain
    }

    pub fn push(&mut self, chain: ClaimChain) {
        self.dirty = true;
        self.live.push(chain);
    }

    /// Stage an audit event, appended only if the transaction commits a write.
    pub fn record(&mut self, event: Event) {
        self.events.push(event);
    }

    pub(super) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(super) fn into_parts(self) -> (Vec<ClaimChain>, Vec<Event>) {
        (self.live, self.events)
    }
}
