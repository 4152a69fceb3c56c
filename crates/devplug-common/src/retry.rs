//! Bounded retry with exponential backoff.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// A bounded-retry policy with exponential backoff.
///
/// The policy is a plain value: construct one with the attempt budget and
/// initial delay, then hand any fallible async operation to
/// [`run`](RetryPolicy::run). Only errors the caller classifies as
/// retryable consume attempts; anything else propagates immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    tries: u32,
    delay: Duration,
    backoff: u32,
}

impl RetryPolicy {
    /// Creates a policy making up to `tries` attempts, starting with
    /// `delay` between them and doubling it after each failure.
    pub fn new(tries: u32, delay: Duration) -> Self {
        Self {
            tries,
            delay,
            backoff: 2,
        }
    }

    /// Sets the backoff multiplier applied to the delay after each failed
    /// attempt.
    pub fn with_backoff(mut self, backoff: u32) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns the total number of attempts this policy makes.
    pub fn tries(&self) -> u32 {
        self.tries
    }

    /// Runs `op` until it succeeds or the attempt budget is exhausted.
    ///
    /// After each failure that `retryable` classifies as transient the
    /// policy logs the error, sleeps for the current delay and multiplies
    /// the delay by the backoff factor. A failure classified as permanent
    /// is returned immediately without consuming further attempts.
    ///
    /// The final attempt runs without an error trap: whatever it returns,
    /// success or error, is handed back to the caller as-is. A policy with
    /// zero or one tries therefore makes exactly one attempt and never
    /// sleeps.
    pub async fn run<T, E, F, Fut, P>(&self, mut op: F, retryable: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let mut remaining = self.tries;
        let mut delay = self.delay;
        while remaining > 1 {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if retryable(&e) => {
                    warn!("{}, retrying in {:?}...", e, delay);
                    tokio::time::sleep(delay).await;
                    remaining -= 1;
                    delay *= self.backoff;
                }
                Err(e) => return Err(e),
            }
        }
        op().await
    }
}

impl Default for RetryPolicy {
    /// Four attempts with a three-second initial delay, doubling after
    /// each failure.
    fn default() -> Self {
        Self::new(4, Duration::from_secs(3))
    }
}
