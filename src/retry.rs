//! Retry decorator with full-jitter exponential backoff.
//!
//! [`RetryClient`] wraps any [`SendRequest`] executor and replays failed
//! network attempts. Only [`ClientError::Network`] is retried; every other
//! error propagates on first occurrence. The delay before attempt `a + 1`
//! is drawn uniformly from `[0, base_delay * 2^(a-1)]` (full jitter), and
//! the sleep blocks the calling thread.

use std::thread;
use std::time::Duration;

use crate::client::SendRequest;
use crate::config::RetryConfig;
use crate::error::{ClientError, ConfigError};
use crate::message::{Request, Response};
use crate::util::DetRng;

/// Executor decorator that replays failed network attempts.
#[derive(Debug)]
pub struct RetryClient<C> {
    inner: C,
    config: RetryConfig,
    rng: DetRng,
}

impl<C: SendRequest> RetryClient<C> {
    /// Wrap `inner` with the given retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroMaxAttempts`] when the configuration
    /// allows no attempt at all.
    pub fn new(inner: C, config: RetryConfig) -> Result<Self, ConfigError> {
        if config.max_attempts < 1 {
            return Err(ConfigError::ZeroMaxAttempts);
        }
        Ok(Self {
            inner,
            config,
            rng: DetRng::from_entropy(),
        })
    }

    /// Use a fixed jitter seed, making the backoff schedule reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = DetRng::new(seed);
        self
    }

    /// Consume the decorator and return the wrapped executor.
    pub fn into_inner(self) -> C {
        self.inner
    }

    /// Delay before the attempt following `attempt`, drawn with full jitter.
    fn backoff_delay(&mut self, attempt: u32) -> Duration {
        let cap = backoff_cap_micros(self.config.base_delay, attempt);
        Duration::from_micros(self.rng.next_inclusive(cap))
    }
}

impl<C: SendRequest> SendRequest for RetryClient<C> {
    fn send_request(&mut self, request: &Request) -> Result<Response, ClientError> {
        let mut attempt = 1;
        loop {
            match self.inner.send_request(request) {
                Ok(response) => return Ok(response),
                Err(ClientError::Network(network)) if attempt < self.config.max_attempts => {
                    let delay = self.backoff_delay(attempt);
                    tracing::debug!(
                        attempt,
                        max_attempts = self.config.max_attempts,
                        delay_us = delay.as_micros() as u64,
                        error = %network,
                        "transfer failed; backing off before retry"
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Inclusive upper bound of the jitter range for `attempt`, in microseconds.
///
/// Saturates instead of overflowing for large attempt counts.
fn backoff_cap_micros(base_delay: Duration, attempt: u32) -> u64 {
    let base = u64::try_from(base_delay.as_micros()).unwrap_or(u64::MAX);
    if base == 0 {
        return 0;
    }
    let shift = attempt.saturating_sub(1);
    if shift >= 64 {
        return u64::MAX;
    }
    base.saturating_mul(1 << shift)
}
