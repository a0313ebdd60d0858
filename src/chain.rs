//! The claim chain record.
//!
//! A chain is one agent's time-bounded reservation over a set of canonical
//! paths. Expiration is never stored; it is derived from `claimed_at`,
//! `ttl_seconds`, and the time at which the chain is read.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Prefix for generated chain identifiers.
pub const CHAIN_ID_PREFIX: &str = "chain-";

/// Stored lifecycle status of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainStatus {
    /// Holding its files until released, completed, or expired.
    Active,
    /// Abandoned by its owner.
    Released,
    /// Finished by its owner.
    Completed,
}

impl ChainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainStatus::Active => "active",
            ChainStatus::Released => "released",
            ChainStatus::Completed => "completed",
        }
    }

    /// Released and completed chains never block again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ChainStatus::Active)
    }
}

impl std::fmt::Display for ChainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reservation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimChain {
    /// Unique identifier, never reassigned.
    pub chain_id: String,

    /// Owning agent.
    pub agent_id: String,

    /// Canonical paths reserved by this chain.
    pub files: BTreeSet<String>,

    /// When the chain was created.
    pub claimed_at: DateTime<Utc>,

    /// Lifetime in seconds, counted from `claimed_at`.
    pub ttl_seconds: u64,

    pub status: ChainStatus,

    /// When the chain was released or completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl ClaimChain {
    /// Create a new active chain with a fresh identifier.
    ///
    /// `files` must already be canonical; see [`crate::claims::canonicalize_files`].
    pub fn new(
        agent_id: &str,
        files: BTreeSet<String>,
        ttl_seconds: u64,
        claimed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            chain_id: generate_chain_id(),
            agent_id: agent_id.to_string(),
            files,
            claimed_at,
            ttl_seconds,
            status: ChainStatus::Active,
            ended_at: None,
        }
    }

    /// The instant at which the chain stops blocking.
    ///
    /// TTLs too large to represent saturate to the maximum timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|ttl| self.claimed_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    /// Active and not yet expired: the only state in which a chain blocks claims.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == ChainStatus::Active && !self.is_expired(now)
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        let left = self.expires_at().signed_duration_since(now);
        left.max(Duration::zero())
    }

    /// When the chain stopped blocking, or `None` while it is live.
    pub fn dormant_since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.status.is_terminal() {
            return Some(self.ended_at.unwrap_or(self.claimed_at));
        }
        if self.is_expired(now) {
            return Some(self.expires_at());
        }
        None
    }

    /// Move to a terminal status.
    pub fn finish(&mut self, status: ChainStatus, now: DateTime<Utc>) {
        self.status = status;
        self.ended_at = Some(now);
    }

    /// Files this chain shares with `files`.
    pub fn overlap(&self, files: &BTreeSet<String>) -> BTreeSet<String> {
        self.files.intersection(files).cloned().collect()
    }

    pub fn holds(&self, file: &str) -> bool {
        self.files.contains(file)
    }
}

fn generate_chain_id() -> String {
    format!("{}{}", CHAIN_ID_PREFIX, Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn new_chain_is_active_with_prefixed_id() {
        let now = Utc::now();
        let chain = ClaimChain::new("agent-x", files(&["f1"]), 60, now);

        assert!(chain.chain_id.starts_with(CHAIN_ID_PREFIX));
        assert_eq!(chain.status, ChainStatus::Active);
        assert!(chain.ended_at.is_none());
        assert!(chain.is_live(now));
    }

    #[test]
    fn chain_ids_are_unique() {
        let now = Utc::now();
        let ids: BTreeSet<String> = (0..500)
            .map(|_| ClaimChain::new("a", BTreeSet::new(), 1, now).chain_id)
            .collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn expiry_is_computed_from_ttl() {
        let now = Utc::now();
        let chain = ClaimChain::new("a", files(&["f1"]), 60, now);

        assert_eq!(chain.expires_at(), now + Duration::seconds(60));
        assert!(!chain.is_expired(now + Duration::seconds(59)));
        assert!(chain.is_expired(now + Duration::seconds(60)));
        assert!(!chain.is_live(now + Duration::seconds(61)));
        assert_eq!(chain.remaining(now + Duration::seconds(20)), Duration::seconds(40));
        assert_eq!(chain.remaining(now + Duration::seconds(90)), Duration::zero());
    }

    #[test]
    fn enormous_ttl_saturates_instead_of_panicking() {
        let now = Utc::now();
        let chain = ClaimChain::new("a", files(&["f1"]), u64::MAX, now);

        assert_eq!(chain.expires_at(), DateTime::<Utc>::MAX_UTC);
        assert!(chain.is_live(now));
    }

    #[test]
    fn finished_chain_is_dormant_from_end_time() {
        let now = Utc::now();
        let mut chain = ClaimChain::new("a", files(&["f1"]), 60, now);
        assert!(chain.dormant_since(now).is_none());

        let later = now + Duration::seconds(5);
        chain.finish(ChainStatus::Completed, later);

        assert!(!chain.is_live(later));
        assert_eq!(chain.dormant_since(later), Some(later));
    }

    #[test]
    fn expired_chain_is_dormant_from_expiry() {
        let now = Utc::now();
        let chain = ClaimChain::new("a", files(&["f1"]), 10, now);
        let later = now + Duration::seconds(30);

        assert_eq!(chain.dormant_since(later), Some(now + Duration::seconds(10)));
    }

    #[test]
    fn overlap_is_set_intersection() {
        let chain = ClaimChain::new("a", files(&["f1", "f2"]), 60, Utc::now());

        assert_eq!(chain.overlap(&files(&["f2", "f3"])), files(&["f2"]));
        assert!(chain.overlap(&files(&["f3"])).is_empty());
        assert!(chain.holds("f1"));
        assert!(!chain.holds("f3"));
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ChainStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert!(ChainStatus::Released.is_terminal());
        assert!(!ChainStatus::Active.is_terminal());
    }

    #[test]
    fn record_serializes_expected_fields() {
        let chain = ClaimChain::new("agent-x", files(&["a/b"]), 30, Utc::now());
        let value = serde_json::to_value(&chain).unwrap();

        for field in ["chain_id", "agent_id", "files", "claimed_at", "ttl_seconds", "status"] {
            assert!(value.get(field).is_some(), "missing field {}", field);
        }
        assert!(value.get("ended_at").is_none());
        assert_eq!(value["status"], "active");
        assert_eq!(value["files"][0], "a/b");
    }
}
