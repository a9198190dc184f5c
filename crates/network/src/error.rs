// crates/network/src/error.rs
//! Error types for network operations

use badgestream_resilience::ResilienceError;
use thiserror::Error;

/// Result type for network operations
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Errors that can occur during network operations
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A request header could not be encoded
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Resilience error (open circuit, deadline, cancellation)
    #[error("Resilience error: {0}")]
    Resilience(#[from] ResilienceError),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

impl NetworkError {
    /// Returns true if an open circuit rejected the call
    pub fn is_broken_circuit(&self) -> bool {
        matches!(self, NetworkError::Resilience(e) if e.is_broken_circuit())
    }

    /// Returns true if the call was abandoned by a timeout or a cancellation
    pub fn is_cancellation(&self) -> bool {
        match self {
            NetworkError::Resilience(e) => e.is_cancellation(),
            NetworkError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
