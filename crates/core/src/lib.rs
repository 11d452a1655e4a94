//! Shared infrastructure for the bommatch workspace
//!
//! This crate provides the plumbing used by every other crate:
//!
//! - **Error handling**: structured errors with codes, context, and recovery suggestions
//! - **Retry policies**: exponential backoff schedules and a circuit breaker
//! - **Rate limiting**: token-bucket throttling for catalog provider quotas
//!
//! # Example
//!
//! ```rust
//! use bommatch_core::retry::RetryConfig;
//!
//! let policy = RetryConfig::batch();
//! assert!(policy.should_retry(0));
//! let delay = policy.delay_for_attempt(1);
//! assert!(!delay.is_zero());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod rate_limit;
pub mod retry;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Error, ErrorCode, Result, ResultExt};
    pub use crate::rate_limit::{RateLimitConfig, RateLimiter};
    pub use crate::retry::{CircuitBreaker, CircuitBreakerConfig, RetryConfig};
}
