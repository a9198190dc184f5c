//! Retry and circuit breaker configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Failure policy settings shared by every upstream pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Retries after the first attempt for transient failures
    pub max_retries: u32,

    /// Minimum time a circuit stays open, in seconds
    pub min_break_duration_secs: u64,

    /// Backoff unit in milliseconds; the n-th retry waits `unit * 2^n`
    pub backoff_unit_ms: u64,
}

impl ResilienceConfig {
    /// Returns the circuit cool-down as a duration
    pub fn min_break_duration(&self) -> Duration {
        Duration::from_secs(self.min_break_duration_secs)
    }

    /// Returns the backoff unit as a duration
    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_break_duration_secs: 30,
            backoff_unit_ms: 1000,
        }
    }
}

impl ConfigSection for ResilienceConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let results = vec![
            Validator::in_range(self.max_retries, 0, 10, "resilience.max_retries"),
            Validator::in_range(
                self.min_break_duration_secs,
                1,
                3600,
                "resilience.min_break_duration_secs",
            ),
            Validator::in_range(self.backoff_unit_ms, 1, 60_000, "resilience.backoff_unit_ms"),
        ];

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.max_retries = other.max_retries;
        self.min_break_duration_secs = other.min_break_duration_secs;
        self.backoff_unit_ms = other.backoff_unit_ms;
    }

    fn section_name(&self) -> &'static str {
        "resilience"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ResilienceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_break_duration(), Duration::from_secs(30));
        assert_eq!(config.backoff_unit(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_retries_is_valid() {
        let mut config = ResilienceConfig::default();
        config.max_retries = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_max_retries() {
        let mut config = ResilienceConfig::default();
        config.max_retries = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_break_duration() {
        let mut config = ResilienceConfig::default();
        config.min_break_duration_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge() {
        let mut base = ResilienceConfig::default();
        let other = ResilienceConfig {
            max_retries: 1,
            min_break_duration_secs: 5,
            backoff_unit_ms: 10,
        };

        base.merge(other.clone());
        assert_eq!(base, other);
    }
}
