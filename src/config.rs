//! # Default retry configuration.
//!
//! Provides [`Config`], a centralized bundle of retry defaults, and
//! [`StrategyKind`], the string-addressable strategy selector for
//! file/env-driven setups. Parsing configuration sources stays outside this
//! crate; callers hand over resolved values and materialize policies with
//! [`Config::backoff`] / [`Config::policy`].
//!
//! ## Sentinel values
//! - `max_delay = 0s` → no ceiling (no clamping applied)
//!
//! ## Example
//! ```rust
//! use retrykit::{Config, StrategyKind};
//!
//! let mut cfg = Config::default();
//! cfg.strategy = "fibonacci".parse::<StrategyKind>().unwrap();
//!
//! let policy = cfg.policy::<std::io::Error>();
//! assert_eq!(policy.max_attempts(), 3);
//! ```

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::policies::Backoff;
use crate::retry::RetryPolicy;

/// Default configuration for retry policies.
///
/// Defines:
/// - **Attempt budget**: how many times an operation may run
/// - **Strategy selection**: which [`Backoff`] variant to materialize,
///   with its numeric parameters
/// - **Ceiling**: a global delay cap (`0s` = none)
///
/// ## Field semantics
/// - `base`: first-attempt delay / scale, depending on the strategy
/// - `factor`: growth factor (exponential variants only)
/// - `degree`: polynomial degree (polynomial only)
/// - `max_delay`: hard ceiling applied on every attempt (`0s` = no ceiling);
///   also serves as the decorrelated variant's range ceiling
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum number of attempts per execution (minimum 1).
    pub max_attempts: u32,
    /// Which backoff strategy to materialize.
    pub strategy: StrategyKind,
    /// Base delay fed to the selected strategy.
    pub base: Duration,
    /// Growth factor for the exponential strategies.
    pub factor: f64,
    /// Degree for the polynomial strategy.
    pub degree: i32,
    /// Global delay ceiling; `Duration::ZERO` means no ceiling.
    pub max_delay: Duration,
}

impl Config {
    /// Returns the delay ceiling as an `Option`.
    ///
    /// - `None` → no ceiling
    /// - `Some(d)` → clamp every computed delay to `d`
    #[inline]
    pub fn max_delay(&self) -> Option<Duration> {
        if self.max_delay == Duration::ZERO {
            None
        } else {
            Some(self.max_delay)
        }
    }

    /// Materializes the selected backoff strategy.
    ///
    /// The decorrelated variant needs a range ceiling; it uses
    /// [`Config::max_delay`], falling back to an unbounded ceiling when the
    /// sentinel says none.
    pub fn backoff(&self) -> Backoff {
        match self.strategy {
            StrategyKind::Constant => Backoff::constant(self.base),
            StrategyKind::Linear => Backoff::linear(self.base),
            StrategyKind::Exponential => Backoff::exponential(self.base, self.factor),
            StrategyKind::ExponentialJitter => Backoff::exponential_jitter(self.base, self.factor),
            StrategyKind::Fibonacci => Backoff::fibonacci(self.base),
            StrategyKind::Polynomial => Backoff::polynomial(self.base, self.degree),
            StrategyKind::Decorrelated => {
                Backoff::decorrelated(self.base, self.max_delay().unwrap_or(Duration::MAX))
            }
        }
    }

    /// Materializes a full [`RetryPolicy`] from these defaults.
    pub fn policy<E>(&self) -> RetryPolicy<E> {
        let policy = RetryPolicy::new(self.max_attempts).with_backoff(self.backoff());
        match self.max_delay() {
            Some(ceiling) => policy.with_max_delay(ceiling),
            None => policy,
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `max_attempts = 3`
    /// - `strategy = exponential`
    /// - `base = 100ms`, `factor = 2.0`, `degree = 2`
    /// - `max_delay = 30s`
    fn default() -> Self {
        Self {
            max_attempts: 3,
            strategy: StrategyKind::Exponential,
            base: Duration::from_millis(100),
            factor: 2.0,
            degree: 2,
            max_delay: Duration::from_secs(30),
        }
    }
}

/// String-addressable selector for the [`Backoff`] family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    /// [`Backoff::Constant`]
    Constant,
    /// [`Backoff::Linear`]
    Linear,
    /// [`Backoff::Exponential`]
    Exponential,
    /// [`Backoff::ExponentialJitter`]
    ExponentialJitter,
    /// [`Backoff::Fibonacci`]
    Fibonacci,
    /// [`Backoff::Polynomial`]
    Polynomial,
    /// [`Backoff::Decorrelated`]
    Decorrelated,
}

impl StrategyKind {
    /// Returns the stable identifier used in configuration sources.
    pub fn as_label(&self) -> &'static str {
        match self {
            StrategyKind::Constant => "constant",
            StrategyKind::Linear => "linear",
            StrategyKind::Exponential => "exponential",
            StrategyKind::ExponentialJitter => "exponential_jitter",
            StrategyKind::Fibonacci => "fibonacci",
            StrategyKind::Polynomial => "polynomial",
            StrategyKind::Decorrelated => "decorrelated",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant" => Ok(StrategyKind::Constant),
            "linear" => Ok(StrategyKind::Linear),
            "exponential" => Ok(StrategyKind::Exponential),
            "exponential_jitter" => Ok(StrategyKind::ExponentialJitter),
            "fibonacci" => Ok(StrategyKind::Fibonacci),
            "polynomial" => Ok(StrategyKind::Polynomial),
            "decorrelated" => Ok(StrategyKind::Decorrelated),
            other => Err(ConfigError::UnknownStrategy {
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_kind_round_trips() {
        let kinds = [
            StrategyKind::Constant,
            StrategyKind::Linear,
            StrategyKind::Exponential,
            StrategyKind::ExponentialJitter,
            StrategyKind::Fibonacci,
            StrategyKind::Polynomial,
            StrategyKind::Decorrelated,
        ];

        for kind in kinds {
            assert_eq!(kind.as_label().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_strategy_is_fatal() {
        let err = "expo".parse::<StrategyKind>().unwrap_err();
        assert_eq!(err.as_label(), "config_unknown_strategy");
        assert!(err.as_message().contains("expo"));
    }

    #[test]
    fn test_zero_max_delay_means_no_ceiling() {
        let cfg = Config {
            max_delay: Duration::ZERO,
            ..Config::default()
        };
        assert_eq!(cfg.max_delay(), None);

        let policy = cfg.policy::<std::io::Error>();
        assert_eq!(policy.max_delay(), None);
    }

    #[test]
    fn test_default_config_materializes() {
        let cfg = Config::default();
        let policy = cfg.policy::<std::io::Error>();

        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.max_delay(), Some(Duration::from_secs(30)));
        // Exponential defaults: 100ms, then 200ms.
        let backoff = cfg.backoff();
        assert_eq!(backoff.delay(1), Duration::from_millis(100));
        assert_eq!(backoff.delay(2), Duration::from_millis(200));
    }

    #[test]
    fn test_selected_strategy_drives_backoff() {
        let cfg = Config {
            strategy: StrategyKind::Linear,
            base: Duration::from_millis(10),
            ..Config::default()
        };
        assert_eq!(cfg.backoff().delay(3), Duration::from_millis(30));

        let cfg = Config {
            strategy: StrategyKind::Polynomial,
            base: Duration::from_micros(1000),
            degree: 2,
            ..Config::default()
        };
        assert_eq!(cfg.backoff().delay_micros(3), 9000);
    }
}
