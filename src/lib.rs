//! # retrykit
//!
//! **Retrykit** is a small retry library for Rust.
//!
//! It executes a fallible operation repeatedly until it succeeds, an attempt
//! budget is exhausted, or a caller-supplied predicate vetoes further
//! attempts, waiting between attempts according to a pluggable backoff
//! strategy. The crate is designed as a building block: the operation under
//! retry is an opaque callable, and its failure type is the caller's own.
//!
//! ## Architecture
//! ```text
//! RetryPolicy<E> ──► execute(operation)
//!
//! loop (attempt = 1..=max_attempts) {
//!   ├─► invoke operation
//!   │       │
//!   │       ├─ Ok  ──► return value
//!   │       │
//!   │       └─ Err ──► retry_if(&err, attempt)? ──false──► return err
//!   │                  attempt == max_attempts? ──yes────► return err
//!   │                  │
//!   │                  ├─► delay = backoff.delay(attempt)
//!   │                  ├─► delay = min(delay, max_delay)
//!   │                  └─► sleep(delay) if delay > 0
//!   └─► next attempt
//! }
//! ```
//!
//! Data flows one way: the executor asks the strategy for a delay, applies
//! the ceiling, sleeps, and re-invokes the operation. Strategies never call
//! back into the executor.
//!
//! ## Features
//! | Area           | Description                                               | Key types / traits               |
//! |----------------|-----------------------------------------------------------|----------------------------------|
//! | **Strategies** | Delay growth curves, jitter, capping combinator.          | [`Backoff`]                      |
//! | **Execution**  | Policy object and curried function form, async + blocking.| [`RetryPolicy`], [`retrier`]     |
//! | **Predicates** | Per-failure veto on continuing.                           | [`RetryPolicy::retry_if`]        |
//! | **Defaults**   | Centralized configuration with a strategy selector.       | [`Config`], [`StrategyKind`]     |
//! | **Errors**     | Typed startup error for unknown strategy names.           | [`ConfigError`]                  |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use retrykit::{Backoff, RetryPolicy};
//!
//! #[derive(Debug)]
//! struct Unavailable {
//!     code: u16,
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let policy: RetryPolicy<Unavailable> = RetryPolicy::new(4)
//!         .with_backoff(Backoff::exponential(Duration::from_millis(1), 2.0))
//!         .with_max_delay(Duration::from_millis(5))
//!         .retry_if(|err: &Unavailable, _attempt| err.code >= 500);
//!
//!     let result = policy
//!         .execute(|| async { Ok::<_, Unavailable>("ready") })
//!         .await;
//!     assert_eq!(result.unwrap(), "ready");
//! }
//! ```
//!
//! ## Concurrency notes
//! Execution is synchronous per call: the async surface parks the calling
//! task for the full delay, the `*_blocking` surface blocks the thread. A
//! policy holding any stateless strategy may be shared across concurrent
//! executions; [`Backoff::Decorrelated`] is stateful and needs one instance
//! per concurrent retry sequence. There is no cancellation primitive — wrap
//! the whole call in an external deadline if one is needed.

mod config;
mod error;
mod policies;
mod retry;

// ---- Public re-exports ----

pub use config::{Config, StrategyKind};
pub use error::ConfigError;
pub use policies::Backoff;
pub use retry::{retrier, BackoffSource, Retrier, RetryPolicy};
