// crates/network/src/transport.rs
//! Transport handles used by the base client

use crate::error::{NetworkError, NetworkResult};
use badgestream_config::HttpConfig;
use reqwest::Client as ReqwestClient;
use std::time::Duration;

/// Transport configuration
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Idle connections kept per host
    pub pool_max_idle_per_host: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            max_redirects: 10,
            pool_max_idle_per_host: 16,
        }
    }
}

impl From<&HttpConfig> for TransportConfig {
    fn from(config: &HttpConfig) -> Self {
        Self {
            timeout: config.request_timeout(),
            connect_timeout: config.connect_timeout(),
            max_redirects: config.max_redirects,
            ..Self::default()
        }
    }
}

/// Supplies a transport for each outbound call
pub trait TransportFactory: Send + Sync {
    /// Returns a client to issue one request with
    fn create_client(&self) -> NetworkResult<ReqwestClient>;
}

/// Default transport backed by one shared connection pool
///
/// `reqwest::Client` is a handle; every call gets its own clone while the
/// pool underneath is reused.
#[derive(Debug, Clone)]
pub struct PooledTransport {
    inner: ReqwestClient,
}

impl PooledTransport {
    /// Creates a transport with default configuration
    pub fn new() -> NetworkResult<Self> {
        Self::with_config(&TransportConfig::default())
    }

    /// Creates a transport with custom configuration
    pub fn with_config(config: &TransportConfig) -> NetworkResult<Self> {
        let inner = ReqwestClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(NetworkError::Http)?;

        Ok(Self { inner })
    }
}

impl TransportFactory for PooledTransport {
    fn create_client(&self) -> NetworkResult<ReqwestClient> {
        Ok(self.inner.clone())
    }
}
