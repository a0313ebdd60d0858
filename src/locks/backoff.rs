//! Exponential backoff with jitter for lock retries.

use rand::Rng;
use std::time::Duration;

/// Parameters for retry delays between lock attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay ceiling for the first retry.
    pub base: Duration,
    /// Upper bound for any single delay.
    pub max: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(10),
            max: Duration::from_millis(500),
        }
    }
}

/// Stateful delay generator.
///
/// The ceiling doubles per attempt (`base * 2^n`, capped at `max`) and each
/// delay is drawn uniformly from `[ceiling / 2, ceiling]`, so waiting
/// processes spread out instead of retrying in lockstep.
#[derive(Debug)]
pub struct Backoff {
    policy: BackoffPolicy,
    attempt: u32,
}

impl Backoff {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self { policy, attempt: 0 }
    }

    /// Number of delays handed out so far.
    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    /// The ceiling for the current attempt, before jitter.
    pub fn ceiling(&self) -> Duration {
        let base_ms = self.policy.base.as_millis().max(1) as u64;
        let max_ms = self.policy.max.as_millis().max(base_ms as u128) as u64;
        let factor = 1u64 << self.attempt.min(20);
        Duration::from_millis(base_ms.saturating_mul(factor).min(max_ms))
    }

    /// Next delay to sleep before retrying.
    pub fn next_delay(&mut self) -> Duration {
        let ceiling_ms = self.ceiling().as_millis() as u64;
        self.attempt = self.attempt.saturating_add(1);

        let floor_ms = ceiling_ms / 2;
        let jittered = rand::rng().random_range(floor_ms..=ceiling_ms);
        Duration::from_millis(jittered)
    }
}
