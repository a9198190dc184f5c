// crates/resilience/src/retry.rs
//! Retry policy with exponential backoff

use crate::status;
use std::time::Duration;

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    max_retries: u32,
    /// Base unit of the backoff; the n-th retry waits `unit * 2^n`
    backoff_unit: Duration,
}

impl RetryPolicy {
    /// Creates a new retry policy with a one second backoff unit
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff_unit: Duration::from_secs(1),
        }
    }

    /// Sets the backoff unit
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Returns the maximum number of retries
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the backoff unit
    pub fn backoff_unit(&self) -> Duration {
        self.backoff_unit
    }

    /// Calculates the wait before the given retry (1-based)
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }

        // Saturate instead of overflowing on absurd retry counts
        let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
        self.backoff_unit.saturating_mul(factor)
    }

    /// Returns the total time spent waiting when every retry is used
    pub fn worst_case_delay(&self) -> Duration {
        (1..=self.max_retries)
            .map(|retry| self.delay_for_retry(retry))
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Checks if a response status warrants another attempt
    pub fn should_retry(&self, status: u16, retries_so_far: u32) -> bool {
        !status::is_success(status)
            && status::is_transient(status)
            && retries_so_far < self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}
