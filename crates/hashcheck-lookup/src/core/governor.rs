//! Adaptive request budget.
//!
//! A token bucket whose refill rate follows the headroom the server reports.
//! Admission costs one token per request; the rate drops as `remaining/limit`
//! shrinks and collapses to a floor after a throttling response.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// Tunables for [`BudgetGovernor`].
///
/// Only the ordering matters for correctness: lower headroom must never map
/// to a higher rate, and `penalty_rate` is the lowest of all.
#[derive(Debug, Clone, PartialEq)]
pub struct GovernorPolicy {
    /// Burst size in requests.
    pub capacity:          f64,
    /// Rate used until the first server feedback arrives.
    pub initial_rate:      f64,
    /// Headroom ratio below which the conservative rate applies.
    pub low_watermark:     f64,
    /// Headroom ratio below which the moderate rate applies.
    pub high_watermark:    f64,
    pub conservative_rate: f64,
    pub moderate_rate:     f64,
    pub generous_rate:     f64,
    /// Floor applied by [`BudgetGovernor::penalty`].
    pub penalty_rate:      f64,
    /// Sleep between admission attempts while the bucket is empty.
    pub poll_interval:     Duration,
}

impl Default for GovernorPolicy {
    fn default() -> Self {
        Self {
            capacity:          5.0,
            initial_rate:      5.0,
            low_watermark:     0.2,
            high_watermark:    0.5,
            conservative_rate: 1.5,
            moderate_rate:     3.0,
            generous_rate:     6.0,
            penalty_rate:      0.5,
            poll_interval:     Duration::from_millis(10),
        }
    }
}

impl GovernorPolicy {
    /// Refill rate for the observed headroom, or `None` when `limit` is zero.
    pub fn rate_for(&self, limit: u32, remaining: u32) -> Option<f64> {
        if limit == 0 {
            return None;
        }
        let ratio = f64::from(remaining) / f64::from(limit);
        let rate = if ratio < self.low_watermark {
            self.conservative_rate
        } else if ratio < self.high_watermark {
            self.moderate_rate
        } else {
            self.generous_rate
        };
        Some(rate)
    }
}

#[derive(Debug)]
struct Bucket {
    tokens:      f64,
    capacity:    f64,
    refill_rate: f64,
    last_refill: Instant,
    penalized:   bool,
}

impl Bucket {
    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.last_refill = now;
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
    }

    fn try_take(&mut self, now: Instant) -> bool {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Bank tokens earned at the old rate before switching.
    fn set_rate(&mut self, rate: f64, now: Instant) {
        self.refill(now);
        self.refill_rate = rate;
    }
}

/// Token-bucket admission control shared by every caller on the network path.
///
/// All state sits behind one mutex that is held only for the refill/debit
/// arithmetic, never across a sleep or a request.
#[derive(Debug)]
pub struct BudgetGovernor {
    policy: GovernorPolicy,
    bucket: Mutex<Bucket>,
}

impl Default for BudgetGovernor {
    fn default() -> Self { Self::new(GovernorPolicy::default()) }
}

impl BudgetGovernor {
    /// Create a governor with a full bucket.
    pub fn new(policy: GovernorPolicy) -> Self {
        let bucket = Bucket {
            tokens:      policy.capacity,
            capacity:    policy.capacity,
            refill_rate: policy.initial_rate,
            last_refill: Instant::now(),
            penalized:   false,
        };
        Self {
            policy,
            bucket: Mutex::new(bucket),
        }
    }

    pub fn policy(&self) -> &GovernorPolicy { &self.policy }

    /// Take one token if one is available right now.
    pub fn try_acquire(&self) -> bool { self.with_bucket(|b| b.try_take(Instant::now())) }

    /// Wait until one token is available, then consume it.
    ///
    /// The lock is released between polls so other callers can make progress.
    pub async fn acquire(&self) {
        let mut polls = 0u64;
        while !self.try_acquire() {
            polls += 1;
            tokio::time::sleep(self.policy.poll_interval).await;
        }
        if polls > 0 {
            tracing::trace!(polls, "admission granted after waiting");
        }
    }

    /// Retune the refill rate from the server's reported headroom.
    ///
    /// Clears any penalty in force. A zero `limit` carries no information and
    /// is ignored.
    pub fn update_from_remaining(&self, limit: u32, remaining: u32) {
        let Some(rate) = self.policy.rate_for(limit, remaining) else {
            return;
        };
        let previous = self.with_bucket(|b| {
            let previous = b.refill_rate;
            b.set_rate(rate, Instant::now());
            b.penalized = false;
            previous
        });
        if previous != rate {
            tracing::debug!(limit, remaining, from = previous, to = rate, "refill rate adjusted");
        }
    }

    /// Drop the refill rate to the floor after a throttling response.
    pub fn penalty(&self) {
        let rate = self.policy.penalty_rate;
        self.with_bucket(|b| {
            b.set_rate(rate, Instant::now());
            b.penalized = true;
        });
        tracing::debug!(rate, "refill rate penalized");
    }

    /// Current refill rate in requests per second.
    pub fn refill_rate(&self) -> f64 { self.with_bucket(|b| b.refill_rate) }

    /// Whether a penalty is in force and not yet cleared by fresh headroom.
    pub fn is_penalized(&self) -> bool { self.with_bucket(|b| b.penalized) }

    fn with_bucket<T>(&self, f: impl FnOnce(&mut Bucket) -> T) -> T {
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn tokens(governor: &BudgetGovernor) -> f64 { governor.with_bucket(|b| b.tokens) }

    fn drain(governor: &BudgetGovernor) {
        while governor.try_acquire() {}
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_burst_is_capacity() {
        let governor = BudgetGovernor::default();
        for _ in 0..5 {
            assert!(governor.try_acquire());
        }
        assert!(!governor.try_acquire());
        assert!(tokens(&governor) >= 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokens_never_exceed_capacity() {
        let governor = BudgetGovernor::default();
        drain(&governor);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(governor.try_acquire());
        assert!(tokens(&governor) <= governor.policy().capacity);

        let mut admitted = 1;
        while governor.try_acquire() {
            admitted += 1;
        }
        assert_eq!(admitted, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sustained_rate_converges_to_refill_rate() {
        let governor = BudgetGovernor::default();
        drain(&governor);

        let start = Instant::now();
        for _ in 0..10 {
            governor.acquire().await;
            assert!(tokens(&governor) >= 0.0);
        }
        let elapsed = start.elapsed();

        // 10 tokens at 5/s, polled every 10ms.
        assert!(elapsed >= Duration::from_millis(1_950), "{elapsed:?}");
        assert!(elapsed <= Duration::from_millis(2_200), "{elapsed:?}");
    }

    #[test]
    fn test_low_headroom_selects_conservative_rate() {
        let governor = BudgetGovernor::default();
        governor.update_from_remaining(100, 10);
        assert_eq!(governor.refill_rate(), 1.5);

        governor.update_from_remaining(100, 30);
        assert_eq!(governor.refill_rate(), 3.0);

        governor.update_from_remaining(100, 80);
        assert_eq!(governor.refill_rate(), 6.0);
    }

    #[test]
    fn test_rate_is_monotonic_in_remaining() {
        let policy = GovernorPolicy::default();
        for limit in [1u32, 7, 100, 300] {
            let mut previous = f64::INFINITY;
            for remaining in (0..=limit).rev() {
                let rate = policy.rate_for(limit, remaining).unwrap();
                assert!(rate <= previous, "limit={limit} remaining={remaining}");
                previous = rate;
            }
        }
    }

    #[test]
    fn test_zero_limit_is_ignored() {
        let governor = BudgetGovernor::default();
        governor.update_from_remaining(0, 0);
        assert_eq!(governor.refill_rate(), 5.0);
    }

    #[test]
    fn test_penalty_persists_until_update() {
        let governor = BudgetGovernor::default();
        governor.update_from_remaining(100, 90);
        governor.penalty();
        assert_eq!(governor.refill_rate(), 0.5);
        assert!(governor.is_penalized());

        governor.update_from_remaining(100, 5);
        assert_eq!(governor.refill_rate(), 1.5);
        assert!(!governor.is_penalized());
    }

    #[tokio::test(start_paused = true)]
    async fn test_penalty_slows_admission() {
        let governor = BudgetGovernor::default();
        drain(&governor);

        let start = Instant::now();
        governor.acquire().await;
        let before = start.elapsed();

        drain(&governor);
        governor.penalty();
        let start = Instant::now();
        governor.acquire().await;
        let after = start.elapsed();

        // At most one poll's worth of tokens carries over from the last grant.
        assert!(after > before);
        assert!(after >= Duration::from_millis(1_850), "{after:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_the_budget() {
        let governor = Arc::new(BudgetGovernor::default());
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..3 {
            let governor = Arc::clone(&governor);
            handles.push(tokio::spawn(async move {
                for _ in 0..4 {
                    governor.acquire().await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // 12 admissions: 5 from the burst, 7 refilled at 5/s.
        assert!(start.elapsed() >= Duration::from_millis(1_350));
        assert!(tokens(&governor) >= 0.0);
    }
}
