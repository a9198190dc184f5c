// crates/resilience/src/lib.rs
//! Resilience primitives for calls to unreliable upstream services
//!
//! This crate holds the transport-agnostic pieces of the upstream client
//! pipeline:
//! - Status classification (success, client error, transient failure)
//! - Circuit breaker state with a lazy cool-down check
//! - Retry policy with exponential backoff
//! - Async timeout handling
//!
//! # Example
//!
//! ```rust
//! use badgestream_resilience::{CircuitBreaker, CircuitBreakerConfig, RetryPolicy};
//! use std::time::Duration;
//!
//! // Retry up to three times, waiting 2s, 4s, 8s
//! let policy = RetryPolicy::new(3);
//! assert_eq!(policy.delay_for_retry(1), Duration::from_secs(2));
//!
//! // Circuit breaker with a 30 second cool-down
//! let cb = CircuitBreaker::new(CircuitBreakerConfig::new(Duration::from_secs(30)));
//! assert!(cb.try_acquire().is_ok());
//! ```

mod circuit_breaker;
mod error;
mod retry;
pub mod status;
mod timeout;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use error::{ResilienceError, ResilienceResult};
pub use retry::RetryPolicy;
pub use timeout::with_timeout;
