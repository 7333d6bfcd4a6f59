//! # Function-style retry surface.
//!
//! [`retrier`] is the curried form of [`RetryPolicy`](crate::RetryPolicy):
//! `retrier(max_attempts, source)` returns a reusable [`Retrier`] that takes
//! the operation to run. The delay source is anything implementing
//! [`BackoffSource`] — a [`Backoff`] value or a plain `Fn(u32) -> Duration`
//! closure, both invoked identically by the loop.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use retrykit::{retrier, Backoff};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let with_strategy = retrier(3, Backoff::linear(Duration::from_millis(1)));
//! let with_closure = retrier(3, |attempt| Duration::from_millis(u64::from(attempt)));
//!
//! let value = with_strategy.run(|| async { Ok::<_, ()>(1) }).await;
//! assert_eq!(value.unwrap(), 1);
//! let value = with_closure.run(|| async { Ok::<_, ()>(2) }).await;
//! assert_eq!(value.unwrap(), 2);
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use crate::policies::Backoff;

/// Anything that can produce an inter-attempt delay.
///
/// Implemented for [`Backoff`] and for bare `Fn(u32) -> Duration` closures;
/// the attempt number is 1-indexed.
pub trait BackoffSource {
    /// Delay to apply after the given failed attempt.
    fn delay(&self, attempt: u32) -> Duration;
}

impl BackoffSource for Backoff {
    fn delay(&self, attempt: u32) -> Duration {
        Backoff::delay(self, attempt)
    }
}

impl<F> BackoffSource for F
where
    F: Fn(u32) -> Duration,
{
    fn delay(&self, attempt: u32) -> Duration {
        self(attempt)
    }
}

/// Reusable executor bundling an attempt budget with a delay source.
///
/// Semantically identical to a [`RetryPolicy`](crate::RetryPolicy) with a
/// backoff and no predicate or ceiling; use the policy form when those knobs
/// are needed.
#[derive(Clone, Debug)]
pub struct Retrier<D> {
    max_attempts: u32,
    source: D,
}

/// Builds a [`Retrier`]; `max_attempts` is clamped to a minimum of 1.
pub fn retrier<D: BackoffSource>(max_attempts: u32, source: D) -> Retrier<D> {
    Retrier::new(max_attempts, source)
}

impl<D: BackoffSource> Retrier<D> {
    /// See [`retrier`].
    pub fn new(max_attempts: u32, source: D) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            source,
        }
    }

    /// Runs `operation` until success or attempt exhaustion, parking the
    /// calling task between attempts.
    pub async fn run<T, E, Fut, Op>(&self, mut operation: Op) -> Result<T, E>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt: u32 = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_attempts {
                        return Err(err);
                    }

                    let delay = self.source.delay(attempt);
                    log::debug!(
                        "attempt {attempt}/{} failed; next attempt in {delay:?}",
                        self.max_attempts
                    );
                    if delay > Duration::ZERO {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// Blocking twin of [`run`](Retrier::run); must not be called from inside
    /// an async runtime.
    pub fn run_blocking<T, E, Op>(&self, mut operation: Op) -> Result<T, E>
    where
        Op: FnMut() -> Result<T, E>,
    {
        let mut attempt: u32 = 1;
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_attempts {
                        return Err(err);
                    }

                    let delay = self.source.delay(attempt);
                    if delay > Duration::ZERO {
                        std::thread::sleep(delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    #[tokio::test]
    async fn test_strategy_source_retries_to_success() {
        let calls = AtomicU32::new(0);

        let result = retrier(5, Backoff::constant(Duration::from_millis(1)))
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { if n < 2 { Err("boom") } else { Ok(42) } }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_closure_source_receives_attempt_numbers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let run = retrier(4, move |attempt| {
            sink.lock().unwrap().push(attempt);
            Duration::ZERO
        });
        let result: Result<(), _> = run.run(|| async { Err("boom") }).await;

        assert!(result.is_err());
        // One delay per non-final failed attempt.
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_closure_source_delays_are_applied() {
        let started = Instant::now();

        let run = retrier(3, |attempt| Duration::from_millis(50 * u64::from(attempt)));
        let result: Result<(), _> = run.run(|| async { Err("boom") }).await;

        assert!(result.is_err());
        // 50ms after attempt 1, 100ms after attempt 2.
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_retrier_is_reusable() {
        let run = retrier(2, Backoff::constant(Duration::from_millis(1)));

        for _ in 0..2 {
            let calls = AtomicU32::new(0);
            let result: Result<(), _> = run
                .run(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err("boom") }
                })
                .await;

            assert!(result.is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 2);
        }
    }

    #[test]
    fn test_blocking_run_matches_async_counts() {
        let calls = AtomicU32::new(0);

        let result = retrier(5, Backoff::constant(Duration::from_millis(1))).run_blocking(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err("boom")
            } else {
                Ok(42)
            }
        });

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_zero_attempts_clamps_to_one() {
        let calls = AtomicU32::new(0);

        let result = retrier(0, Backoff::constant(Duration::ZERO)).run_blocking(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>("boom")
        });

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
