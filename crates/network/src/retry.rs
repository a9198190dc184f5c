// crates/network/src/retry.rs
//! Retry layer

use crate::client::ResilientClient;
use crate::error::NetworkResult;
use crate::request::RequestFactory;
use async_trait::async_trait;
use badgestream_resilience::RetryPolicy;
use reqwest::Response;

/// Retries transient failures (408, 502, 503, 504) with exponential backoff
///
/// Each attempt rebuilds the request from the factory. When the budget runs
/// out, or the failure is not transient, the last response is returned as is.
pub struct RetryClient<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: ResilientClient> RetryClient<C> {
    /// Wraps `inner`, retrying up to `max_retries` times
    pub fn new(inner: C, max_retries: u32) -> Self {
        Self::with_policy(inner, RetryPolicy::new(max_retries))
    }

    /// Wraps `inner` with a custom policy
    pub fn with_policy(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Returns the retry policy
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns the inner client
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: ResilientClient> ResilientClient for RetryClient<C> {
    async fn send(&self, factory: &dyn RequestFactory) -> NetworkResult<Response> {
        let mut retries = 0;

        loop {
            let response = self.inner.send(factory).await?;
            let code = response.status().as_u16();

            if !self.policy.should_retry(code, retries) {
                return Ok(response);
            }

            retries += 1;
            let delay = self.policy.delay_for_retry(retries);
            log::warn!(
                "Retrying {} after status {}: {} retries left, waiting {:?}",
                response.url(),
                code,
                self.policy.max_retries() - retries,
                delay
            );

            drop(response);
            tokio::time::sleep(delay).await;
        }
    }
}
