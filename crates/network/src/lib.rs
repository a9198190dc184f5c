// crates/network/src/lib.rs
//! Resilient outbound HTTP client pipeline
//!
//! Every call to an upstream registry or CI feed goes through a fixed chain
//! of layers, each wrapping the one below:
//!
//! - [`BaseClient`] issues the request with identification headers
//! - [`CircuitBreakerClient`] stops calling an upstream that just failed
//! - [`RetryClient`] retries transient failures with exponential backoff
//! - [`FallbackClient`] turns every failure into an empty string
//!
//! Use [`build_pipeline`] for a single upstream or [`UpstreamRegistry`] to
//! share one pipeline per upstream across a service.

mod circuit_breaker;
mod client;
mod error;
mod fallback;
mod pipeline;
mod request;
mod retry;
mod transport;

pub use circuit_breaker::CircuitBreakerClient;
pub use client::{BaseClient, ResilientClient, ServiceIdentity};
pub use error::{NetworkError, NetworkResult};
pub use fallback::{FallbackClient, TextFetcher};
pub use pipeline::{
    build_pipeline, build_pipeline_with, PipelineConfig, UpstreamClient, UpstreamRegistry,
};
pub use request::{OutboundRequest, RequestFactory};
pub use retry::RetryClient;
pub use transport::{PooledTransport, TransportConfig, TransportFactory};

pub use tokio_util::sync::CancellationToken;
