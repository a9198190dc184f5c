// crates/feeds/src/client.rs
//! Feed lookups on top of a never-failing text fetcher

use crate::endpoint::{FeedEndpoint, FeedQuery};
use badgestream_network::TextFetcher;
use serde_json::Value;

/// Fetches one feed through a resilient pipeline
///
/// Like the pipeline itself, lookups never fail: no data is an empty string
/// or `None`.
pub struct FeedClient<F> {
    endpoint: FeedEndpoint,
    fetcher: F,
}

impl<F: TextFetcher> FeedClient<F> {
    pub fn new(endpoint: FeedEndpoint, fetcher: F) -> Self {
        Self { endpoint, fetcher }
    }

    pub fn endpoint(&self) -> &FeedEndpoint {
        &self.endpoint
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Returns the raw response body for `query`
    pub async fn fetch_text(&self, query: &FeedQuery) -> String {
        let request = match self.endpoint.request_for(query) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Cannot query feed {}: {}", self.endpoint.name(), e);
                return String::new();
            }
        };

        self.fetcher.fetch_text(&request).await
    }

    /// Returns the response body for `query` parsed as JSON
    pub async fn fetch_json(&self, query: &FeedQuery) -> Option<Value> {
        let body = self.fetch_text(query).await;
        if body.is_empty() {
            return None;
        }

        match serde_json::from_str(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!(
                    "Feed {} returned invalid JSON for {}: {}",
                    self.endpoint.name(),
                    query.package,
                    e
                );
                None
            }
        }
    }
}
