//! Bounded retry with linear backoff.
//!
//! Used by network-dependent bootstrap steps. Attempt `n` (1-based) that
//! fails is followed by a wait of `base_delay * n` before attempt `n + 1`;
//! with the defaults that is 5s, then 10s. No wait follows the last attempt.

use std::time::Duration;

use crate::error::{RigupError, Result};
use crate::host::Host;

/// Retry bounds for a network operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Backoff unit; the wait after attempt `n` is `base_delay * n`.
    pub base_delay: Duration,
    /// Per-attempt network timeout.
    pub network_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(5),
            network_timeout: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Wait after failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Upper bound on time spent, assuming each attempt hits its timeout.
    pub fn worst_case(&self) -> Duration {
        let waits: Duration = (1..self.max_attempts).map(|a| self.delay_after(a)).sum();
        self.network_timeout * self.max_attempts + waits
    }

    /// Run `op` until it succeeds or attempts run out.
    ///
    /// Returns the value and the number of attempts used. Sleeps go through
    /// [`Host::sleep`].
    pub fn run<T>(
        &self,
        operation: &str,
        host: &mut dyn Host,
        mut op: impl FnMut(&mut dyn Host, u32) -> Result<T>,
    ) -> Result<(T, u32)> {
        let max = self.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max {
            match op(&mut *host, attempt) {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!("{} succeeded on attempt {}/{}", operation, attempt, max);
                    }
                    return Ok((value, attempt));
                }
                Err(e) => {
                    last_error = e.to_string();
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}",
                        operation,
                        attempt,
                        max,
                        last_error
                    );
                    if attempt < max {
                        let delay = self.delay_after(attempt);
                        tracing::info!("Retrying {} in {}s", operation, delay.as_secs());
                        host.sleep(delay);
                    }
                }
            }
        }

        Err(RigupError::RetriesExhausted {
            operation: operation.to_string(),
            attempts: max,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;

    #[test]
    fn default_schedule_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(5));
        assert_eq!(policy.delay_after(2), Duration::from_secs(10));
        assert_eq!(policy.delay_after(3), Duration::from_secs(15));
    }

    #[test]
    fn worst_case_adds_timeouts_and_waits() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.worst_case(), Duration::from_secs(3 * 60 + 5 + 10));
    }

    #[test]
    fn succeeds_on_third_attempt() {
        let mut host = MockHost::macos();
        let policy = RetryPolicy::default();

        let (value, attempts) = policy
            .run("download", &mut host, |_, attempt| {
                if attempt < 3 {
                    Err(RigupError::Network {
                        url: "https://example.com".into(),
                        message: "timeout".into(),
                    })
                } else {
                    Ok("script")
                }
            })
            .unwrap();

        assert_eq!(value, "script");
        assert_eq!(attempts, 3);
        assert_eq!(
            host.sleeps(),
            &[Duration::from_secs(5), Duration::from_secs(10)]
        );
    }

    #[test]
    fn exhausts_after_max_attempts() {
        let mut host = MockHost::macos();
        let policy = RetryPolicy::default();
        let mut calls = 0;

        let err = policy
            .run::<()>("download", &mut host, |_, _| {
                calls += 1;
                Err(RigupError::step("homebrew", "offline"))
            })
            .unwrap_err();

        assert_eq!(calls, 3);
        assert!(matches!(err, RigupError::RetriesExhausted { attempts: 3, .. }));
        assert!(err.to_string().contains("offline"));
        assert_eq!(host.sleeps().len(), 2);
    }

    #[test]
    fn first_try_success_does_not_sleep() {
        let mut host = MockHost::macos();
        let (_, attempts) = RetryPolicy::default()
            .run("download", &mut host, |_, _| Ok(()))
            .unwrap();
        assert_eq!(attempts, 1);
        assert!(host.sleeps().is_empty());
    }
}
