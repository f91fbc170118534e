//! Retry policy for inventory calls
//!
//! One policy object is applied identically to every page request, so all
//! listings share the same backoff behavior. Only errors classified as
//! retryable (`Throttled`, `TransientRemoteFailure`) are re-attempted.

use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::config::retry as retry_config;
use crate::error::Result;

/// Backoff parameters: {attempt ceiling, base delay, cap, jitter}
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per call, first try included
    pub max_attempts: u32,
    /// Base delay in milliseconds
    pub base_delay_ms: u64,
    /// Delay cap in milliseconds
    pub max_delay_ms: u64,
    /// Jitter factor 0.0–1.0 applied symmetrically (±)
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry_config::MAX_ATTEMPTS,
            base_delay_ms: retry_config::BASE_DELAY_MS,
            max_delay_ms: retry_config::MAX_DELAY_MS,
            jitter_factor: retry_config::JITTER_FACTOR,
        }
    }
}

impl RetryPolicy {
    /// Run `call` until it succeeds, fails with a non-retryable error, or
    /// the attempt ceiling is reached. The last error is returned as-is.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: u32 = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff_delay(attempt);
                    debug!(
                        "{} attempt {}/{} failed: {}; retrying in {}ms",
                        operation,
                        attempt,
                        self.max_attempts,
                        err,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Delay before the next attempt, given how many attempts have failed
    pub fn backoff_delay(&self, failed_attempts: u32) -> Duration {
        let ms = backoff_delay_ms(
            failed_attempts.saturating_sub(1),
            self.base_delay_ms,
            self.max_delay_ms,
            self.jitter_factor,
            random_unit(),
        );
        Duration::from_millis(ms)
    }
}

/// Exponential backoff with symmetric jitter.
///
/// Formula: `min(max_delay, base * 2^retry) * (1 + (2·random − 1) · jitter)`
/// where `retry` is zero-based and `random` is in `[0, 1)`.
fn backoff_delay_ms(
    retry: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
    jitter_factor: f64,
    random: f64,
) -> u64 {
    let exponential = base_delay_ms.saturating_mul(1u64 << retry.min(31));
    let capped = exponential.min(max_delay_ms);

    let jitter = 1.0 + (random * 2.0 - 1.0) * jitter_factor;
    ((capped as f64) * jitter).round().max(0.0) as u64
}

/// Jitter seed in [0, 1) from clock noise
fn random_unit() -> f64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    f64::from(nanos % 1_000) / 1_000.0
}
