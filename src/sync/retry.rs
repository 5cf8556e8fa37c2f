/// Exponential backoff with jitter for remote application failures.
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::limits::{DEFAULT_BACKOFF_INITIAL_MS, DEFAULT_BACKOFF_MAX_MS};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicy {
    pub backoff_initial_ms: u64,
    pub backoff_max_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff_initial_ms: DEFAULT_BACKOFF_INITIAL_MS,
            backoff_max_ms: DEFAULT_BACKOFF_MAX_MS,
        }
    }
}

impl RetryPolicy {
    /// Backoff before jitter after `attempts` consecutive failures (>= 1).
    pub fn base_delay_ms(&self, attempts: u32) -> u64 {
        let factor = 1u64 << (attempts.saturating_sub(1).min(16));
        self.backoff_initial_ms
            .saturating_mul(factor)
            .min(self.backoff_max_ms)
    }

    /// When the next attempt is due, with up to 50% jitter on top of the
    /// base delay.
    pub fn next_attempt_at(&self, attempts: u32, now: DateTime<Utc>) -> DateTime<Utc> {
        let base = self.base_delay_ms(attempts);
        let jitter = rand::thread_rng().gen_range(0..=base / 2);
        let delay = i64::try_from(base.saturating_add(jitter)).unwrap_or(i64::MAX);
        now.checked_add_signed(Duration::milliseconds(delay))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Backoff bookkeeping for one scope. Lives in memory only: after a
/// restart every pending scope is retried immediately.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryState {
    pub attempts: u32,
    pub next_attempt_at: DateTime<Utc>,
    pub last_error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_delay_doubles_and_caps() {
        let policy = RetryPolicy {
            backoff_initial_ms: 100,
            backoff_max_ms: 1_000,
        };
        assert_eq!(policy.base_delay_ms(1), 100);
        assert_eq!(policy.base_delay_ms(2), 200);
        assert_eq!(policy.base_delay_ms(4), 800);
        assert_eq!(policy.base_delay_ms(5), 1_000);
        assert_eq!(policy.base_delay_ms(u32::MAX), 1_000);
    }

    #[test]
    fn test_next_attempt_within_jitter_window() {
        let policy = RetryPolicy {
            backoff_initial_ms: 1_000,
            backoff_max_ms: 60_000,
        };
        let now = Utc::now();
        for _ in 0..32 {
            let at = policy.next_attempt_at(2, now);
            let delay = (at - now).num_milliseconds();
            assert!((2_000..=3_000).contains(&delay), "delay {}", delay);
        }
    }

    #[test]
    fn test_policy_from_partial_json() {
        let policy: RetryPolicy = serde_json::from_str(r#"{"backoff_initial_ms": 10}"#).unwrap();
        assert_eq!(policy.backoff_initial_ms, 10);
        assert_eq!(policy.backoff_max_ms, DEFAULT_BACKOFF_MAX_MS);
        assert!(serde_json::from_str::<RetryPolicy>(r#"{"max_attempts": 3}"#).is_err());
    }
}
