// crates/resilience/src/circuit_breaker.rs
//! Circuit breaker pattern implementation
//!
//! The breaker has two states. It opens on a single upstream failure and
//! closes lazily: the first call made after the cool-down has elapsed closes
//! the circuit and goes through.

use crate::error::{ResilienceError, ResilienceResult};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Circuit is closed, requests flow normally
    Closed,
    /// Circuit is open, requests are rejected
    Open,
}

/// Circuit breaker configuration
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Minimum time the circuit stays open after a failure
    min_break_duration: Duration,
}

impl CircuitBreakerConfig {
    /// Creates a new configuration
    pub fn new(min_break_duration: Duration) -> Self {
        Self { min_break_duration }
    }

    /// Returns the minimum cool-down
    pub fn min_break_duration(&self) -> Duration {
        self.min_break_duration
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[derive(Debug)]
struct CircuitBreakerState {
    is_open: bool,
    opened_at: Option<Instant>,
}

/// Circuit breaker implementation
///
/// Clones share the same state, so one breaker (and its clones) should guard
/// exactly one upstream.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: Arc<Mutex<CircuitBreakerState>>,
}

impl CircuitBreaker {
    /// Creates a new circuit breaker
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(CircuitBreakerState {
                is_open: false,
                opened_at: None,
            })),
        }
    }

    /// Returns the configuration
    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    // A poisoned lock still holds consistent state: every critical section
    // below is a handful of plain field writes.
    fn lock(&self) -> MutexGuard<'_, CircuitBreakerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Gets the current state without evaluating the cool-down
    pub fn state(&self) -> CircuitState {
        if self.lock().is_open {
            CircuitState::Open
        } else {
            CircuitState::Closed
        }
    }

    /// Checks if a request can proceed
    ///
    /// An open circuit whose cool-down has elapsed is closed here and the
    /// request is let through. Otherwise the request is rejected with
    /// [`ResilienceError::BrokenCircuit`].
    pub fn try_acquire(&self) -> ResilienceResult<()> {
        let mut state = self.lock();

        if !state.is_open {
            return Ok(());
        }

        let elapsed = state
            .opened_at
            .map(|opened_at| opened_at.elapsed())
            .unwrap_or(Duration::ZERO);

        if elapsed > self.config.min_break_duration {
            state.is_open = false;
            Ok(())
        } else {
            Err(ResilienceError::BrokenCircuit {
                retry_in: self.config.min_break_duration - elapsed,
            })
        }
    }

    /// Opens the circuit after an upstream failure
    ///
    /// Returns the break duration suggested by the upstream: the larger of
    /// the configured minimum and `retry_after`. Only the configured minimum
    /// gates the next [`try_acquire`](Self::try_acquire).
    pub fn trip(&self, retry_after: Option<Duration>) -> Duration {
        {
            let mut state = self.lock();
            state.is_open = true;
            state.opened_at = Some(Instant::now());
        }

        retry_after
            .map(|hint| hint.max(self.config.min_break_duration))
            .unwrap_or(self.config.min_break_duration)
    }

    /// Resets the circuit breaker to closed state
    pub fn reset(&self) {
        let mut state = self.lock();
        state.is_open = false;
        state.opened_at = None;
    }
}
