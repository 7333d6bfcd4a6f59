//! Error types owned by this crate.
//!
//! The retry executor is a pass-through for the caller's own failure type
//! and defines no error of its own. The single library-owned error,
//! [`ConfigError`], belongs to the configuration layer: resolving a
//! [`Config`](crate::Config) into an executable policy at startup.

use thiserror::Error;

/// # Errors produced while resolving configuration.
///
/// These are fatal at startup, never retryable runtime conditions.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Strategy identifier does not name any known backoff variant.
    #[error("unknown backoff strategy {name:?}")]
    UnknownStrategy {
        /// The identifier as it appeared in configuration.
        name: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retrykit::ConfigError;
    ///
    /// let err = ConfigError::UnknownStrategy { name: "expo".into() };
    /// assert_eq!(err.as_label(), "config_unknown_strategy");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::UnknownStrategy { .. } => "config_unknown_strategy",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::UnknownStrategy { name } => {
                format!("unknown backoff strategy: {name}")
            }
        }
    }
}
