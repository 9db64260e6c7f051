//! Bounded retry with linear backoff for any [`TrendStrategy`].
//!
//! # Retry Strategy
//!
//! - Fixed number of attempts (3 by default)
//! - Linear backoff: `base_delay * attempt` (2s, 4s, ...)
//! - Random jitter (0-250ms) added when the base delay is non-zero
//! - No sleep after the final attempt
//!
//! Only errors are retried. An upstream that answers successfully with an
//! empty list is taken at its word.

use super::TrendStrategy;
use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Wrapper that adds a bounded retry loop to any [`TrendStrategy`].
///
/// The wrapper is itself a strategy, so the resolver treats retried and
/// single-shot sources alike.
pub struct RetryFetch<T> {
    /// The underlying strategy to wrap.
    inner: T,
    /// Total number of attempts, including the first.
    max_attempts: usize,
    /// Delay unit; attempt `n` waits `n * base_delay` before the next try.
    base_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: TrendStrategy,
{
    /// Wrap `inner` with `max_attempts` tries (at least one) and a linear
    /// backoff of `base_delay` per failed attempt.
    pub fn new(inner: T, max_attempts: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    fn backoff(&self, attempt: usize) -> StdDuration {
        let delay = self.base_delay.saturating_mul(attempt as u32);
        if delay.is_zero() {
            return delay;
        }
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + StdDuration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .finish()
    }
}

impl<T> TrendStrategy for RetryFetch<T>
where
    T: TrendStrategy,
{
    fn label(&self) -> &str {
        self.inner.label()
    }

    #[instrument(level = "info", skip_all, fields(strategy = self.inner.label()))]
    async fn fetch(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.fetch().await {
                Ok(items) => return Ok(items),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt >= self.max_attempts {
                        error!(
                            attempt,
                            max = self.max_attempts,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "fetch() exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        max = self.max_attempts,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "fetch() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
