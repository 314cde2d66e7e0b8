//! Per-agent cooldown gate in front of every mutating action.
//!
//! An agent may perform one decision or message per cooldown window. The
//! check and the timestamp update happen under one lock, so two racing
//! calls for the same agent cannot both be allowed, and a denied call
//! leaves no trace.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

use agora_types::AgentName;

/// Outcome of [`RateLimiter::try_act`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// The action may proceed; the slot has been consumed.
    Allowed,
    /// The agent is cooling down.
    Denied {
        /// Time until the agent may act again.
        retry_after: TimeDelta,
    },
}

impl RateDecision {
    /// Whether the action may proceed.
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Fixed-window cooldown per agent.
#[derive(Debug)]
pub struct RateLimiter {
    cooldown: TimeDelta,
    last_action: Mutex<HashMap<AgentName, DateTime<Utc>>>,
}

impl RateLimiter {
    /// Create a limiter with the given cooldown.
    pub fn new(cooldown: TimeDelta) -> Self {
        Self {
            cooldown,
            last_action: Mutex::new(HashMap::new()),
        }
    }

    /// Create a limiter from a cooldown in whole seconds.
    pub fn from_secs(secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        Self::new(TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX))
    }

    /// The configured cooldown.
    pub const fn cooldown(&self) -> TimeDelta {
        self.cooldown
    }

    /// Check and, if allowed, consume the agent's slot at `now`.
    ///
    /// Allowed once at least the cooldown has elapsed since the last
    /// allowed action. A clock that stepped backwards counts as no time
    /// elapsed.
    pub fn try_act(&self, agent: &AgentName, now: DateTime<Utc>) -> RateDecision {
        let mut last_action = self.last_action.lock();
        if let Some(last) = last_action.get(agent) {
            let elapsed = now.signed_duration_since(*last).max(TimeDelta::zero());
            if elapsed < self.cooldown {
                return RateDecision::Denied {
                    retry_after: self.cooldown.checked_sub(&elapsed).unwrap_or(self.cooldown),
                };
            }
        }
        last_action.insert(agent.clone(), now);
        RateDecision::Allowed
    }

    /// Time until `agent` may act, or `None` if it may act now. Read-only.
    pub fn remaining(&self, agent: &AgentName, now: DateTime<Utc>) -> Option<TimeDelta> {
        let last = *self.last_action.lock().get(agent)?;
        let elapsed = now.signed_duration_since(last).max(TimeDelta::zero());
        (elapsed < self.cooldown).then(|| self.cooldown.checked_sub(&elapsed).unwrap_or(self.cooldown))
    }

    /// Forget every agent whose cooldown has fully elapsed at `now`.
    /// Returns how many entries were dropped.
    pub fn prune(&self, now: DateTime<Utc>) -> usize {
        let mut last_action = self.last_action.lock();
        let before = last_action.len();
        last_action.retain(|_, last| now.signed_duration_since(*last) < self.cooldown);
        before.saturating_sub(last_action.len())
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn marcus() -> AgentName {
        AgentName::from("Marcus")
    }

    #[test]
    fn first_action_is_allowed() {
        let limiter = RateLimiter::from_secs(30);
        assert!(limiter.try_act(&marcus(), Utc::now()).is_allowed());
    }

    #[test]
    fn second_action_within_window_is_denied_with_remaining_wait() {
        let limiter = RateLimiter::from_secs(30);
        let t0 = Utc::now();
        assert!(limiter.try_act(&marcus(), t0).is_allowed());
        let decision = limiter.try_act(&marcus(), t0 + TimeDelta::seconds(12));
        assert_eq!(
            decision,
            RateDecision::Denied {
                retry_after: TimeDelta::seconds(18)
            }
        );
    }

    #[test]
    fn denied_call_does_not_extend_the_window() {
        let limiter = RateLimiter::from_secs(30);
        let t0 = Utc::now();
        limiter.try_act(&marcus(), t0);
        limiter.try_act(&marcus(), t0 + TimeDelta::seconds(29));
        assert!(
            limiter
                .try_act(&marcus(), t0 + TimeDelta::seconds(30))
                .is_allowed()
        );
    }

    #[test]
    fn agents_are_independent() {
        let limiter = RateLimiter::from_secs(30);
        let t0 = Utc::now();
        assert!(limiter.try_act(&marcus(), t0).is_allowed());
        assert!(limiter.try_act(&AgentName::from("Pompey"), t0).is_allowed());
    }

    #[test]
    fn backwards_clock_counts_as_no_time() {
        let limiter = RateLimiter::from_secs(30);
        let t0 = Utc::now();
        limiter.try_act(&marcus(), t0);
        let decision = limiter.try_act(&marcus(), t0 - TimeDelta::seconds(5));
        assert_eq!(
            decision,
            RateDecision::Denied {
                retry_after: TimeDelta::seconds(30)
            }
        );
    }

    #[test]
    fn remaining_and_prune() {
        let limiter = RateLimiter::from_secs(30);
        let t0 = Utc::now();
        assert_eq!(limiter.remaining(&marcus(), t0), None);
        limiter.try_act(&marcus(), t0);
        assert_eq!(
            limiter.remaining(&marcus(), t0 + TimeDelta::seconds(10)),
            Some(TimeDelta::seconds(20))
        );
        assert_eq!(limiter.prune(t0 + TimeDelta::seconds(10)), 0);
        assert_eq!(limiter.prune(t0 + TimeDelta::seconds(31)), 1);
    }

    #[test]
    fn racing_calls_allow_exactly_one() {
        let limiter = Arc::new(RateLimiter::from_secs(30));
        let allowed = Arc::new(AtomicUsize::new(0));
        let now = Utc::now();
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let allowed = Arc::clone(&allowed);
                std::thread::spawn(move || {
                    if limiter.try_act(&marcus(), now).is_allowed() {
                        allowed.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().is_ok());
        }
        assert_eq!(allowed.load(Ordering::SeqCst), 1);
    }
}
