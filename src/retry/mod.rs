//! Retry execution.
//!
//! Two equivalent surfaces over the same loop semantics:
//! - [`RetryPolicy`] the reusable, multiply-invocable policy object
//!   (backoff + ceiling + predicate)
//! - [`retrier`] / [`Retrier`] the curried function form, taking a
//!   [`BackoffSource`] (a strategy value or a bare closure)

mod policy;
mod retrier;

pub use policy::RetryPolicy;
pub use retrier::{retrier, BackoffSource, Retrier};
