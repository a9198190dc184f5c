// crates/network/src/circuit_breaker.rs
//! Circuit breaker layer

use crate::client::ResilientClient;
use crate::error::NetworkResult;
use crate::request::RequestFactory;
use async_trait::async_trait;
use badgestream_resilience::{status, CircuitBreaker, CircuitBreakerConfig, CircuitState};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::Response;
use std::time::Duration;

/// Opens a circuit after a server-side failure and rejects calls until the
/// cool-down has passed
///
/// Successes and client errors pass through untouched. Failing responses
/// are returned to the caller after the circuit opens; errors from the inner
/// client propagate unchanged and leave the circuit alone.
pub struct CircuitBreakerClient<C> {
    inner: C,
    breaker: CircuitBreaker,
}

impl<C: ResilientClient> CircuitBreakerClient<C> {
    /// Wraps `inner` with a circuit that stays open for at least `min_break_duration`
    pub fn new(inner: C, min_break_duration: Duration) -> Self {
        Self::with_breaker(inner, CircuitBreaker::new(CircuitBreakerConfig::new(min_break_duration)))
    }

    /// Wraps `inner` with an existing breaker
    pub fn with_breaker(inner: C, breaker: CircuitBreaker) -> Self {
        Self { inner, breaker }
    }

    /// Returns the current circuit state
    pub fn state(&self) -> CircuitState {
        self.breaker.state()
    }

    /// Returns the breaker guarding this client
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Returns the inner client
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: ResilientClient> ResilientClient for CircuitBreakerClient<C> {
    async fn send(&self, factory: &dyn RequestFactory) -> NetworkResult<Response> {
        self.breaker.try_acquire()?;

        let response = self.inner.send(factory).await?;
        let code = response.status().as_u16();

        if status::opens_circuit(code) {
            let break_for = self.breaker.trip(retry_after(response.headers()));
            log::warn!(
                "Opening circuit for {}: upstream returned {}, breaking for {:?}",
                response.url(),
                code,
                break_for
            );
        }

        Ok(response)
    }
}

/// Reads a `Retry-After` header as a delay
///
/// Accepts both delta-seconds and an HTTP date. Dates in the past yield a
/// zero delay.
pub(crate) fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let at = DateTime::parse_from_rfc2822(value).ok()?.with_timezone(&Utc);
    Some((at - Utc::now()).to_std().unwrap_or(Duration::ZERO))
}
