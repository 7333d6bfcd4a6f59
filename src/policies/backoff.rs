//! # Backoff strategy family.
//!
//! [`Backoff`] maps a 1-indexed attempt number to an inter-attempt delay.
//! Growth shapes range from a flat constant to exponential, Fibonacci and
//! polynomial curves, with optional randomization (full jitter on top of the
//! exponential curve, or the stateful decorrelated scheme) and a
//! [`Backoff::Capped`] combinator that bounds any other variant.
//!
//! Delays are computed in whole microseconds. Fractional intermediate results
//! are truncated toward zero inside the strategy, so callers always observe
//! integer delays. No variant panics: attempt `0`, factor `<= 0`, degree `0`
//! or negative degree all degrade to a defined numeric result.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use retrykit::Backoff;
//!
//! let backoff = Backoff::exponential(Duration::from_millis(100), 2.0);
//!
//! // Attempt 1 — base delay (100ms)
//! assert_eq!(backoff.delay(1), Duration::from_millis(100));
//!
//! // Attempt 3 — 100ms × 2^2 = 400ms
//! assert_eq!(backoff.delay(3), Duration::from_millis(400));
//!
//! // Bound the curve at 250ms
//! let capped = backoff.capped(Duration::from_millis(250));
//! assert_eq!(capped.delay(3), Duration::from_millis(250));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;

/// Pluggable delay-growth strategy for retries.
///
/// Each variant carries immutable configuration, except
/// [`Backoff::Decorrelated`] which carries one mutable field (`prev`) that
/// persists across calls on the same instance.
///
/// ## Trade-offs
/// - **Constant / Linear**: predictable, gentle growth
/// - **Exponential**: standard choice for unhealthy dependencies
/// - **ExponentialJitter**: exponential ceiling with full randomization,
///   spreads synchronized retriers apart
/// - **Fibonacci**: grows slower than exponential, faster than linear
/// - **Polynomial**: tunable curve via the degree
/// - **Decorrelated**: stateful jitter whose range follows its own previous
///   output rather than the attempt number
/// - **Capped**: hard ceiling around any other variant, nestable
#[derive(Debug)]
pub enum Backoff {
    /// Same delay for every attempt; the attempt number is ignored.
    Constant {
        /// Delay in microseconds.
        delay: u64,
    },

    /// `base × attempt`, growing by one base step per attempt.
    Linear {
        /// Step size in microseconds.
        base: u64,
    },

    /// `base × factor^(attempt - 1)`, truncated to whole microseconds.
    Exponential {
        /// First-attempt delay in microseconds.
        base: u64,
        /// Multiplicative growth factor (`>= 1.0` recommended).
        factor: f64,
    },

    /// Uniform random delay in `[0, base × factor^(attempt - 1)]`.
    ///
    /// The exponential value is only the upper bound; when it is `0` the
    /// delay is `0`.
    ExponentialJitter {
        /// Upper-bound base in microseconds.
        base: u64,
        /// Multiplicative growth factor for the upper bound.
        factor: f64,
    },

    /// `base × fib(attempt)` with `fib(0) = fib(1) = 1`.
    Fibonacci {
        /// Unit delay in microseconds.
        base: u64,
    },

    /// `base × attempt^degree`, truncated to whole microseconds.
    ///
    /// Degree `0` pins the delay at `base`; a negative degree shrinks the
    /// delay toward zero as attempts grow.
    Polynomial {
        /// Scale in microseconds.
        base: u64,
        /// Polynomial degree.
        degree: i32,
    },

    /// Decorrelated jitter: uniform random in `[base, prev × 3]`, clamped to
    /// `max`; the clamped result becomes the next call's `prev`.
    ///
    /// The attempt number is deliberately ignored — the range follows the
    /// previous output. The `prev` field makes this the one stateful
    /// variant: sharing an instance across concurrent retry sequences
    /// interleaves their state (there is no internal locking). Construct one
    /// instance per sequence.
    Decorrelated {
        /// Range floor and initial `prev`, in microseconds.
        base: u64,
        /// Hard ceiling in microseconds.
        max: u64,
        /// Previous output; seeded with `base` at construction.
        prev: AtomicU64,
    },

    /// `min(inner delay, max)` — a ceiling around any other variant.
    ///
    /// Nesting two ceilings behaves like a single ceiling at the lower value.
    Capped {
        /// Wrapped strategy.
        inner: Box<Backoff>,
        /// Ceiling in microseconds.
        max: u64,
    },
}

impl Backoff {
    /// Fixed delay for every attempt.
    pub fn constant(delay: Duration) -> Self {
        Backoff::Constant {
            delay: to_micros(delay),
        }
    }

    /// Delay grows by `base` per attempt.
    pub fn linear(base: Duration) -> Self {
        Backoff::Linear {
            base: to_micros(base),
        }
    }

    /// Delay multiplies by `factor` per attempt, starting at `base`.
    pub fn exponential(base: Duration, factor: f64) -> Self {
        Backoff::Exponential {
            base: to_micros(base),
            factor,
        }
    }

    /// Random delay bounded above by the exponential curve.
    pub fn exponential_jitter(base: Duration, factor: f64) -> Self {
        Backoff::ExponentialJitter {
            base: to_micros(base),
            factor,
        }
    }

    /// Delay follows the Fibonacci sequence scaled by `base`.
    pub fn fibonacci(base: Duration) -> Self {
        Backoff::Fibonacci {
            base: to_micros(base),
        }
    }

    /// Delay follows `base × attempt^degree`.
    pub fn polynomial(base: Duration, degree: i32) -> Self {
        Backoff::Polynomial {
            base: to_micros(base),
            degree,
        }
    }

    /// Stateful decorrelated jitter over `[base, max]`.
    ///
    /// The returned instance must not be shared across concurrent retry
    /// sequences; see [`Backoff::Decorrelated`].
    pub fn decorrelated(base: Duration, max: Duration) -> Self {
        let base = to_micros(base);
        Backoff::Decorrelated {
            base,
            max: to_micros(max),
            prev: AtomicU64::new(base),
        }
    }

    /// Wraps `self` in a hard ceiling.
    pub fn capped(self, max: Duration) -> Self {
        Backoff::Capped {
            inner: Box::new(self),
            max: to_micros(max),
        }
    }

    /// Computes the delay for the given attempt number (1-indexed).
    pub fn delay(&self, attempt: u32) -> Duration {
        Duration::from_micros(self.delay_micros(attempt))
    }

    /// Computes the delay for the given attempt number, in whole microseconds.
    ///
    /// Defined for every `attempt` including `0` (the growth curves treat it
    /// like the first attempt where the exponent would underflow) and for
    /// degenerate configuration; results saturate instead of overflowing.
    pub fn delay_micros(&self, attempt: u32) -> u64 {
        match self {
            Backoff::Constant { delay } => *delay,
            Backoff::Linear { base } => base.saturating_mul(u64::from(attempt)),
            Backoff::Exponential { base, factor } => exponential_micros(*base, *factor, attempt),
            Backoff::ExponentialJitter { base, factor } => {
                let high = exponential_micros(*base, *factor, attempt);
                if high == 0 {
                    return 0;
                }
                rand::rng().random_range(0..=high)
            }
            Backoff::Fibonacci { base } => base.saturating_mul(fibonacci(attempt)),
            Backoff::Polynomial { base, degree } => {
                truncate(*base as f64 * f64::from(attempt).powi(*degree))
            }
            Backoff::Decorrelated { base, max, prev } => {
                let high = prev.load(Ordering::Relaxed).saturating_mul(3);
                let picked = if *base >= high {
                    *base
                } else {
                    rand::rng().random_range(*base..=high)
                };

                let next = picked.min(*max);
                prev.store(next, Ordering::Relaxed);
                next
            }
            Backoff::Capped { inner, max } => inner.delay_micros(attempt).min(*max),
        }
    }
}

impl Default for Backoff {
    /// Returns an exponential strategy with `base = 100ms` and `factor = 2.0`.
    fn default() -> Self {
        Backoff::exponential(Duration::from_millis(100), 2.0)
    }
}

impl Clone for Backoff {
    /// Clones the configuration; for [`Backoff::Decorrelated`] the current
    /// `prev` value is snapshotted, so the clone continues from the same
    /// point but evolves independently.
    fn clone(&self) -> Self {
        match self {
            Backoff::Constant { delay } => Backoff::Constant { delay: *delay },
            Backoff::Linear { base } => Backoff::Linear { base: *base },
            Backoff::Exponential { base, factor } => Backoff::Exponential {
                base: *base,
                factor: *factor,
            },
            Backoff::ExponentialJitter { base, factor } => Backoff::ExponentialJitter {
                base: *base,
                factor: *factor,
            },
            Backoff::Fibonacci { base } => Backoff::Fibonacci { base: *base },
            Backoff::Polynomial { base, degree } => Backoff::Polynomial {
                base: *base,
                degree: *degree,
            },
            Backoff::Decorrelated { base, max, prev } => Backoff::Decorrelated {
                base: *base,
                max: *max,
                prev: AtomicU64::new(prev.load(Ordering::Relaxed)),
            },
            Backoff::Capped { inner, max } => Backoff::Capped {
                inner: inner.clone(),
                max: *max,
            },
        }
    }
}

/// Exact for the supported range; saturates past `u64::MAX` microseconds.
fn to_micros(delay: Duration) -> u64 {
    delay.as_micros().min(u128::from(u64::MAX)) as u64
}

/// Saturating truncation toward zero: NaN and negatives map to `0`,
/// `+inf` to `u64::MAX`.
fn truncate(value: f64) -> u64 {
    value as u64
}

fn exponential_micros(base: u64, factor: f64, attempt: u32) -> u64 {
    let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
    truncate(base as f64 * factor.powi(exponent))
}

/// Iterative Fibonacci with `fib(0) = fib(1) = 1`; saturates for large `n`.
fn fibonacci(n: u32) -> u64 {
    let (mut a, mut b) = (1u64, 1u64);
    for _ in 1..n {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    b
}
