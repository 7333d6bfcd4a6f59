//! Backoff policies.
//!
//! This module groups the knobs that control **how long** to wait between
//! retry attempts.
//!
//! ## Contents
//! - [`Backoff`] the delay-growth strategy family (constant / linear /
//!   exponential / jittered / Fibonacci / polynomial / decorrelated) plus the
//!   capping combinator
//!
//! ## Quick wiring
//! ```text
//! RetryPolicy { backoff: Option<Backoff>, max_delay: Option<Duration> }
//!      └─► retry::policy uses:
//!           - backoff.delay(attempt) for the raw delay
//!           - max_delay as a global ceiling on top of it
//! ```

mod backoff;

pub use backoff::Backoff;
