// crates/network/src/fallback.rs
//! Fallback layer, the outermost part of every pipeline
//!
//! Turns every outcome into a string. An empty string means "no data" and is
//! what badge rendering expects when an upstream cannot answer.

use crate::client::ResilientClient;
use crate::error::{NetworkError, NetworkResult};
use crate::request::RequestFactory;
use async_trait::async_trait;
use badgestream_resilience::{status, with_timeout, ResilienceError};
use reqwest::{Response, StatusCode};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fetches text for a request and never fails
#[async_trait]
pub trait TextFetcher: Send + Sync {
    /// Returns the response body, or an empty string when there is none
    async fn fetch_text(&self, factory: &dyn RequestFactory) -> String;
}

/// Absorbs every failure mode of the chain below into an empty string
pub struct FallbackClient<C> {
    inner: C,
    deadline: Option<Duration>,
}

impl<C: ResilientClient> FallbackClient<C> {
    /// Wraps `inner`
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            deadline: None,
        }
    }

    /// Abandons calls, retries included, that take longer than `deadline`
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns the inner client
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Sends the request and returns the body of a 200 response
    pub async fn send(&self, factory: &dyn RequestFactory) -> String {
        let outcome = match self.deadline {
            Some(deadline) => with_timeout(deadline, self.inner.send(factory))
                .await
                .unwrap_or_else(|e| Err(e.into())),
            None => self.inner.send(factory).await,
        };

        self.resolve(outcome).await
    }

    /// Like [`send`](Self::send), but gives up as soon as `token` is cancelled
    ///
    /// The in-flight call is dropped, which aborts the transport request.
    pub async fn send_with_cancellation(
        &self,
        factory: &dyn RequestFactory,
        token: &CancellationToken,
    ) -> String {
        tokio::select! {
            _ = token.cancelled() => {
                self.resolve(Err(ResilienceError::Cancelled.into())).await
            }
            body = self.send(factory) => body,
        }
    }

    async fn resolve(&self, outcome: NetworkResult<Response>) -> String {
        match outcome {
            Ok(response) if response.status() == StatusCode::OK => {
                let url = response.url().clone();
                match response.text().await {
                    Ok(body) => body,
                    Err(e) if e.is_timeout() => String::new(),
                    Err(e) => {
                        log::error!("Failed to read response body from {}: {:?}", url, e);
                        String::new()
                    }
                }
            }
            Ok(response) => {
                let code = response.status().as_u16();
                if status::is_client_error(code) {
                    log::warn!("Upstream {} rejected request with {}", response.url(), code);
                } else {
                    log::debug!("Upstream {} answered {}, no data", response.url(), code);
                }
                String::new()
            }
            Err(e) if e.is_broken_circuit() || e.is_cancellation() => String::new(),
            Err(e) => {
                log_unexpected(&e);
                String::new()
            }
        }
    }
}

fn log_unexpected(error: &NetworkError) {
    match error {
        NetworkError::Http(e) => match e.url() {
            Some(url) => log::error!("Request to {} failed: {:?}", url, e),
            None => log::error!("Request failed: {:?}", e),
        },
        other => log::error!("Request failed: {:?}", other),
    }
}

#[async_trait]
impl<C: ResilientClient> TextFetcher for FallbackClient<C> {
    async fn fetch_text(&self, factory: &dyn RequestFactory) -> String {
        self.send(factory).await
    }
}

#[async_trait]
impl<F> TextFetcher for std::sync::Arc<F>
where
    F: TextFetcher + ?Sized,
{
    async fn fetch_text(&self, factory: &dyn RequestFactory) -> String {
        (**self).fetch_text(factory).await
    }
}
