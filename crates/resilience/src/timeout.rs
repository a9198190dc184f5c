// crates/resilience/src/timeout.rs
//! Deadlines for async operations

use crate::error::{ResilienceError, ResilienceResult};
use std::future::Future;
use std::time::Duration;

/// Runs a future to completion or fails once `duration` has passed
///
/// The future is dropped on expiry, which cancels whatever it was awaiting.
pub async fn with_timeout<F, T>(duration: Duration, operation: F) -> ResilienceResult<T>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, operation)
        .await
        .map_err(|_| ResilienceError::Timeout(duration))
}
