//! Lazy expiration and pruning.
//!
//! Nothing sweeps the document in the background. Expired chains are hidden
//! at read time and physically dropped only during a later write.

use crate::chain::ClaimChain;
use chrono::{DateTime, Duration, Utc};

/// Chains that are active and unexpired at `now`.
pub fn live_chains(chains: &[ClaimChain], now: DateTime<Utc>) -> Vec<ClaimChain> {
    chains
        .iter()
        .filter(|chain| chain.is_live(now))
        .cloned()
        .collect()
}

/// Split records into `(live, dormant)` at `now`.
pub fn partition_live(
    chains: Vec<ClaimChain>,
    now: DateTime<Utc>,
) -> (Vec<ClaimChain>, Vec<ClaimChain>) {
    chains.into_iter().partition(|chain| chain.is_live(now))
}

/// Drop dormant records that stopped blocking more than `retention` ago.
///
/// A zero retention drops every dormant record.
pub fn prune_dormant(
    dormant: Vec<ClaimChain>,
    now: DateTime<Utc>,
    retention: Duration,
) -> Vec<ClaimChain> {
    dormant
        .into_iter()
        .filter(|chain| match chain.dormant_since(now) {
            Some(since) => since
                .checked_add_signed(retention)
                .is_none_or(|keep_until| keep_until > now),
            None => true,
        })
        .collect()
}
