//! Engine and decorator configuration.

use std::time::Duration;

/// Default bound on one readiness wait inside the drive loop.
const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default pause before re-polling when a wait yields no readiness signal.
const DEFAULT_POLL_SLEEP: Duration = Duration::from_micros(1000);

/// Configuration for [`Client`](crate::client::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Primitive-specific option overrides, passed through to every
    /// transfer untouched.
    pub transport_overrides: Vec<(String, String)>,
    /// Upper bound on one readiness wait in the multiplexer's drive loop.
    pub wait_timeout: Duration,
    /// Pause before re-polling when the wait reports nothing ready, to
    /// avoid a hot spin loop.
    pub poll_sleep: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            transport_overrides: Vec::new(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            poll_sleep: DEFAULT_POLL_SLEEP,
        }
    }
}

/// Configuration for [`RetryClient`](crate::retry::RetryClient).
///
/// `max_attempts` counts every invocation of the inner executor, including
/// the first; it must be at least 1. `base_delay` seeds the full-jitter
/// backoff schedule: the delay before attempt `a + 1` is drawn uniformly
/// from `[0, base_delay * 2^(a-1)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total invocation budget for the inner executor.
    pub max_attempts: u32,
    /// Backoff base; a zero duration disables sleeping between attempts.
    pub base_delay: Duration,
}

impl RetryConfig {
    /// Create a retry configuration.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
        }
    }
}
