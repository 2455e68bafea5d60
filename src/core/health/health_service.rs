// Database health supervision.
//
// A failed probe never leaves the store dead: `ensure_healthy` keeps
// reconnecting with exponential backoff until the probe passes or the attempt
// budget runs out. The background loop in main calls it on an interval.

use crate::core::store::{HealthProbe, HealthStatus};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_retry2::strategy::{jitter, ExponentialBackoff};
use tokio_retry2::{Retry, RetryError};

/// Reconnect schedule: `initial_delay` doubling per attempt, capped at
/// `max_delay`, with random jitter, for at most `max_attempts` reconnects.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            max_attempts: 6,
        }
    }
}

impl BackoffPolicy {
    /// Delays between reconnect attempts, without jitter. The first attempt
    /// runs immediately, so there is one delay fewer than attempts.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> {
        // ExponentialBackoff yields factor * base^n; base 2 with half the
        // initial delay as factor gives initial, 2 * initial, 4 * initial...
        let half_initial = (self.initial_delay.as_millis() as u64 / 2).max(1);
        ExponentialBackoff::from_millis(2)
            .factor(half_initial)
            .max_delay(self.max_delay)
            .take(self.max_attempts.saturating_sub(1) as usize)
    }

    fn strategy(&self) -> impl Iterator<Item = Duration> {
        self.schedule().map(jitter)
    }
}

pub struct HealthSupervisor<S: HealthProbe> {
    store: S,
    policy: BackoffPolicy,
}

impl<S: HealthProbe> HealthSupervisor<S> {
    pub fn new(store: S, policy: BackoffPolicy) -> Self {
        Self { store, policy }
    }

    /// Probe once, without trying to recover.
    pub async fn check(&self) -> HealthStatus {
        tracing::debug!("Probing database health");
        self.store.health_check().await
    }

    /// Probe, and on failure reconnect with backoff until healthy or out of attempts.
    /// Returns the last observed status.
    pub async fn ensure_healthy(&self) -> HealthStatus {
        let status = self.check().await;
        if status.is_healthy() {
            return status;
        }

        tracing::error!(%status, "Database health check failed, reconnecting");

        let store = &self.store;
        let attempts = &AtomicU32::new(0);
        let result = Retry::spawn(self.policy.strategy(), || async move {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;

            if let Err(e) = store.reconnect().await {
                tracing::warn!(attempt, error = %e, "Reconnect attempt failed");
                return Err(RetryError::Transient {
                    err: e.to_string(),
                    retry_after: None,
                });
            }

            match store.health_check().await {
                HealthStatus::Healthy => Ok(attempt),
                HealthStatus::Unhealthy { error } => {
                    tracing::warn!(attempt, %error, "Probe still failing after reconnect");
                    Err(RetryError::Transient {
                        err: error,
                        retry_after: None,
                    })
                }
            }
        })
        .await;

        match result {
            Ok(attempt) => {
                tracing::info!(attempt, "Database connection restored");
                HealthStatus::Healthy
            }
            Err(error) => {
                tracing::error!(
                    attempts = attempts.load(Ordering::SeqCst),
                    %error,
                    "Database still unhealthy after reconnect attempts"
                );
                HealthStatus::Unhealthy { error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::StoreError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    /// Probe that stays down until `failures_left` reconnects have failed.
    struct FlakyProbe {
        up: AtomicBool,
        failures_left: AtomicU32,
        reconnects: AtomicU32,
    }

    impl FlakyProbe {
        fn new(up: bool, failing_reconnects: u32) -> Self {
            Self {
                up: AtomicBool::new(up),
                failures_left: AtomicU32::new(failing_reconnects),
                reconnects: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl HealthProbe for FlakyProbe {
        async fn health_check(&self) -> HealthStatus {
            if self.up.load(Ordering::SeqCst) {
                HealthStatus::Healthy
            } else {
                HealthStatus::Unhealthy {
                    error: "connection reset".to_string(),
                }
            }
        }

        async fn reconnect(&self) -> Result<(), StoreError> {
            self.reconnects.fetch_add(1, Ordering::SeqCst);
            if self.failures_left.load(Ordering::SeqCst) > 0 {
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                return Err(StoreError::Connectivity("refused".to_string()));
            }
            self.up.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn fast_policy(max_attempts: u32) -> BackoffPolicy {
        BackoffPolicy {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            max_attempts,
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = BackoffPolicy {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            max_attempts: 6,
        };

        let delays: Vec<Duration> = policy.schedule().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(500),
                Duration::from_millis(500),
            ]
        );
    }

    #[test]
    fn test_jittered_delays_never_exceed_the_cap() {
        let policy = BackoffPolicy {
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(4),
            max_attempts: 8,
        };

        for _ in 0..20 {
            let delays: Vec<Duration> = policy.strategy().collect();
            assert_eq!(delays.len(), 7);
            assert!(delays.iter().all(|d| *d <= Duration::from_secs(4)));
        }
    }

    #[tokio::test]
    async fn test_healthy_store_is_not_reconnected() {
        let supervisor = HealthSupervisor::new(FlakyProbe::new(true, 0), fast_policy(3));

        assert!(supervisor.ensure_healthy().await.is_healthy());
        assert_eq!(supervisor.store.reconnects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_recovers_after_failed_reconnects() {
        let supervisor = HealthSupervisor::new(FlakyProbe::new(false, 2), fast_policy(5));

        assert!(supervisor.ensure_healthy().await.is_healthy());
        assert_eq!(supervisor.store.reconnects.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let supervisor = HealthSupervisor::new(FlakyProbe::new(false, 10), fast_policy(3));

        let status = supervisor.ensure_healthy().await;
        assert!(!status.is_healthy());
        assert_eq!(supervisor.store.reconnects.load(Ordering::SeqCst), 3);
    }
}
