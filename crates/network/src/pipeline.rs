// crates/network/src/pipeline.rs
//! Assembly of the fixed client chain and per-upstream reuse
//!
//! ```text
//! FallbackClient → RetryClient → CircuitBreakerClient → BaseClient → network
//! ```

use crate::circuit_breaker::CircuitBreakerClient;
use crate::client::{BaseClient, ServiceIdentity};
use crate::error::NetworkResult;
use crate::fallback::FallbackClient;
use crate::retry::RetryClient;
use crate::transport::{PooledTransport, TransportConfig, TransportFactory};
use badgestream_config::Config;
use badgestream_resilience::RetryPolicy;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

/// The full chain handed to feed lookups
pub type UpstreamClient<T = PooledTransport> =
    FallbackClient<RetryClient<CircuitBreakerClient<BaseClient<T>>>>;

/// Settings for one pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Identity sent as `User-Agent`
    pub identity: ServiceIdentity,
    /// Transport settings
    pub transport: TransportConfig,
    /// Retries for transient failures
    pub max_retries: u32,
    /// Backoff unit; the n-th retry waits `unit * 2^n`
    pub backoff_unit: Duration,
    /// Minimum time an opened circuit rejects calls
    pub min_break_duration: Duration,
    /// Optional deadline for a whole call, retries included
    pub call_deadline: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            identity: ServiceIdentity::default(),
            transport: TransportConfig::default(),
            max_retries: 3,
            backoff_unit: Duration::from_secs(1),
            min_break_duration: Duration::from_secs(30),
            call_deadline: None,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            identity: ServiceIdentity::new(
                config.http.service_name.clone(),
                config.http.service_version.clone(),
            ),
            transport: TransportConfig::from(&config.http),
            max_retries: config.resilience.max_retries,
            backoff_unit: config.resilience.backoff_unit(),
            min_break_duration: config.resilience.min_break_duration(),
            call_deadline: config.http.call_deadline(),
        }
    }
}

/// Builds the chain on top of the given transport
pub fn build_pipeline_with<T: TransportFactory>(
    config: &PipelineConfig,
    transport: T,
) -> NetworkResult<UpstreamClient<T>> {
    let base = BaseClient::new(transport, &config.identity)?;
    let breaker = CircuitBreakerClient::new(base, config.min_break_duration);
    let policy = RetryPolicy::new(config.max_retries).with_backoff_unit(config.backoff_unit);
    let retry = RetryClient::with_policy(breaker, policy);

    let fallback = FallbackClient::new(retry);
    Ok(match config.call_deadline {
        Some(deadline) => fallback.with_deadline(deadline),
        None => fallback,
    })
}

/// Builds the chain with its own pooled transport
pub fn build_pipeline(config: &PipelineConfig) -> NetworkResult<UpstreamClient> {
    let transport = PooledTransport::with_config(&config.transport)?;
    build_pipeline_with(config, transport)
}

/// One shared pipeline per upstream
///
/// Circuit state lives in the pipeline, so every call to the same upstream
/// must go through the same instance. All pipelines share one connection
/// pool.
pub struct UpstreamRegistry {
    config: PipelineConfig,
    transport: PooledTransport,
    clients: DashMap<String, Arc<UpstreamClient>>,
}

impl UpstreamRegistry {
    /// Creates an empty registry
    pub fn new(config: PipelineConfig) -> NetworkResult<Self> {
        let transport = PooledTransport::with_config(&config.transport)?;

        Ok(Self {
            config,
            transport,
            clients: DashMap::new(),
        })
    }

    /// Returns the pipeline for `upstream`, creating it on first use
    pub fn get(&self, upstream: &str) -> NetworkResult<Arc<UpstreamClient>> {
        if let Some(client) = self.clients.get(upstream) {
            return Ok(Arc::clone(client.value()));
        }

        let entry = self.clients.entry(upstream.to_string());
        let client = match entry {
            dashmap::mapref::entry::Entry::Occupied(existing) => Arc::clone(existing.get()),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let client = Arc::new(build_pipeline_with(&self.config, self.transport.clone())?);
                log::debug!("Created pipeline for upstream {}", upstream);
                slot.insert(Arc::clone(&client));
                client
            }
        };

        Ok(client)
    }

    /// Returns the number of upstreams seen so far
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns true if no pipeline has been created yet
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Returns the settings every pipeline is built with
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
