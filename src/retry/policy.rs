//! # RetryPolicy: bounded retry execution.
//!
//! Drives repeated invocation of one fallible operation with:
//! - an attempt budget (`max_attempts`),
//! - delays per [`Backoff`] (optional),
//! - a global delay ceiling (optional),
//! - a caller-supplied retry predicate (optional).
//!
//! ## Attempt flow
//! ```text
//! loop (attempt = 1..=max_attempts) {
//!   ├─► invoke operation
//!   │       │
//!   │       ├─ Ok  ──► return value (no delay after success)
//!   │       │
//!   │       └─ Err ──► predicate says stop?        ─► return error
//!   │                  last permitted attempt?     ─► return error
//!   │                  otherwise:
//!   │                    ├─► delay = backoff.delay(attempt)
//!   │                    ├─► clamp to max_delay
//!   │                    ├─► sleep if delay > 0
//!   │                    └─► continue with attempt + 1
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; the caller is parked for the full delay
//! - The failure from the **final** failing attempt is returned verbatim;
//!   intermediate failures are discarded once a later attempt is made
//! - The predicate runs at most once per failed attempt, before any delay
//!   and before consuming another attempt

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::policies::Backoff;

/// Caller-supplied veto: `(failure, attempt_number) -> keep retrying?`
type RetryPredicate<E> = Arc<dyn Fn(&E, u32) -> bool + Send + Sync>;

/// Reusable retry configuration, generic over the operation's error type.
///
/// A policy is a plain value: the reconfiguration methods
/// ([`with_backoff`](RetryPolicy::with_backoff),
/// [`with_max_delay`](RetryPolicy::with_max_delay),
/// [`retry_if`](RetryPolicy::retry_if)) each return a **new** policy and
/// leave the original untouched, so policies derived from a shared base can
/// execute concurrently without interference.
///
/// The executor introduces no error type of its own: `execute` returns the
/// operation's success value or the operation's own failure from the final
/// attempt, unwrapped.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use retrykit::{Backoff, RetryPolicy};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let policy: RetryPolicy<std::io::Error> = RetryPolicy::new(3)
///     .with_backoff(Backoff::exponential(Duration::from_millis(1), 2.0))
///     .retry_if(|err: &std::io::Error, _attempt| err.kind() == std::io::ErrorKind::Interrupted);
///
/// let value = policy.execute(|| async { Ok::<_, std::io::Error>(42) }).await;
/// assert_eq!(value.unwrap(), 42);
/// # }
/// ```
pub struct RetryPolicy<E> {
    max_attempts: u32,
    backoff: Option<Backoff>,
    max_delay: Option<u64>,
    retry_if: Option<RetryPredicate<E>>,
}

impl<E> RetryPolicy<E> {
    /// Creates a policy that invokes the operation at most `max_attempts`
    /// times, with no backoff, no ceiling and no predicate.
    ///
    /// `max_attempts` is clamped to a minimum of 1.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: None,
            max_delay: None,
            retry_if: None,
        }
    }

    /// Returns a new policy with the given backoff strategy.
    pub fn with_backoff(&self, backoff: Backoff) -> Self {
        Self {
            backoff: Some(backoff),
            ..self.clone()
        }
    }

    /// Returns a new policy with a global delay ceiling.
    ///
    /// Applied after the strategy computes its delay, on every attempt.
    pub fn with_max_delay(&self, max_delay: Duration) -> Self {
        Self {
            max_delay: Some(max_delay.as_micros().min(u128::from(u64::MAX)) as u64),
            ..self.clone()
        }
    }

    /// Returns a new policy with a retry predicate.
    ///
    /// The predicate is evaluated after every failure with the failure and
    /// the 1-indexed attempt number; returning `false` propagates the failure
    /// immediately without consuming further attempts or applying a delay.
    pub fn retry_if<F>(&self, predicate: F) -> Self
    where
        F: Fn(&E, u32) -> bool + Send + Sync + 'static,
    {
        Self {
            retry_if: Some(Arc::new(predicate)),
            ..self.clone()
        }
    }

    /// Returns the attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the configured backoff strategy, if any.
    pub fn backoff(&self) -> Option<&Backoff> {
        self.backoff.as_ref()
    }

    /// Returns the configured delay ceiling, if any.
    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay.map(Duration::from_micros)
    }

    /// Executes `operation` under this policy, parking the calling task
    /// between attempts via `tokio::time::sleep`.
    ///
    /// Returns the first success, or the failure from the final failing
    /// attempt. Success values are never inspected; failures are only passed
    /// to the predicate and returned.
    pub async fn execute<T, Fut, Op>(&self, mut operation: Op) -> Result<T, E>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt: u32 = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => match self.after_failure(&err, attempt) {
                    Verdict::Stop => return Err(err),
                    Verdict::RetryAfter(delay) => {
                        if delay > Duration::ZERO {
                            tokio::time::sleep(delay).await;
                        }
                        attempt += 1;
                    }
                },
            }
        }
    }

    /// Blocking twin of [`execute`](RetryPolicy::execute), sleeping with
    /// `std::thread::sleep`.
    ///
    /// Do not call from inside an async runtime; it blocks the whole thread
    /// for the full delay.
    pub fn execute_blocking<T, Op>(&self, mut operation: Op) -> Result<T, E>
    where
        Op: FnMut() -> Result<T, E>,
    {
        let mut attempt: u32 = 1;
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(err) => match self.after_failure(&err, attempt) {
                    Verdict::Stop => return Err(err),
                    Verdict::RetryAfter(delay) => {
                        if delay > Duration::ZERO {
                            std::thread::sleep(delay);
                        }
                        attempt += 1;
                    }
                },
            }
        }
    }

    /// Decides what happens after a failed attempt: predicate first, then the
    /// attempt budget, then the delay computation.
    fn after_failure(&self, err: &E, attempt: u32) -> Verdict {
        if let Some(predicate) = &self.retry_if {
            if !predicate(err, attempt) {
                log::debug!("retry vetoed by predicate at attempt {attempt}");
                return Verdict::Stop;
            }
        }
        if attempt >= self.max_attempts {
            log::debug!("attempts exhausted ({attempt}/{})", self.max_attempts);
            return Verdict::Stop;
        }

        let delay = self.delay_for(attempt);
        log::debug!(
            "attempt {attempt}/{} failed; next attempt in {delay:?}",
            self.max_attempts
        );
        Verdict::RetryAfter(delay)
    }

    /// Strategy delay for the given attempt, clamped to the ceiling.
    ///
    /// No strategy configured means no delay.
    fn delay_for(&self, attempt: u32) -> Duration {
        let Some(backoff) = &self.backoff else {
            return Duration::ZERO;
        };

        let mut micros = backoff.delay_micros(attempt);
        if let Some(cap) = self.max_delay {
            micros = micros.min(cap);
        }
        Duration::from_micros(micros)
    }
}

enum Verdict {
    Stop,
    RetryAfter(Duration),
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_attempts: self.max_attempts,
            backoff: self.backoff.clone(),
            max_delay: self.max_delay,
            retry_if: self.retry_if.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &self.backoff)
            .field("max_delay", &self.max_delay.map(Duration::from_micros))
            .field("retry_if", &self.retry_if.is_some())
            .finish()
    }
}
