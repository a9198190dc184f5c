// crates/resilience/src/error.rs
//! Error types for resilience operations

use std::time::Duration;
use thiserror::Error;

/// Result type for resilience operations
pub type ResilienceResult<T> = Result<T, ResilienceError>;

/// Errors that can occur in resilience operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResilienceError {
    /// Circuit is open; the call was rejected without reaching the upstream
    #[error("Circuit is open, retry in {retry_in:?}")]
    BrokenCircuit { retry_in: Duration },

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// Operation was cancelled
    #[error("Operation was cancelled")]
    Cancelled,
}

impl ResilienceError {
    /// Returns true if the call was short-circuited by an open circuit
    pub fn is_broken_circuit(&self) -> bool {
        matches!(self, ResilienceError::BrokenCircuit { .. })
    }

    /// Returns true if the call was abandoned by a deadline or a cancellation
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ResilienceError::Timeout(_) | ResilienceError::Cancelled)
    }
}
