// crates/network/src/client.rs
//! Client capability shared by every pipeline layer, and the leaf client

use crate::error::{NetworkError, NetworkResult};
use crate::request::RequestFactory;
use crate::transport::{PooledTransport, TransportFactory};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Response;
use std::sync::Arc;

/// Something that can issue a request built by a [`RequestFactory`]
///
/// Implemented by the base client and by every layer that wraps it. A layer
/// owns exactly one inner client.
#[async_trait]
pub trait ResilientClient: Send + Sync {
    /// Sends one logical call, which may involve several attempts
    async fn send(&self, factory: &dyn RequestFactory) -> NetworkResult<Response>;
}

#[async_trait]
impl<C> ResilientClient for Arc<C>
where
    C: ResilientClient + ?Sized,
{
    async fn send(&self, factory: &dyn RequestFactory) -> NetworkResult<Response> {
        (**self).send(factory).await
    }
}

#[async_trait]
impl<C> ResilientClient for Box<C>
where
    C: ResilientClient + ?Sized,
{
    async fn send(&self, factory: &dyn RequestFactory) -> NetworkResult<Response> {
        (**self).send(factory).await
    }
}

/// Name and version announced to upstreams
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub name: String,
    pub version: String,
}

impl ServiceIdentity {
    /// Creates an identity
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Formats the identity as a `User-Agent` value
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl Default for ServiceIdentity {
    fn default() -> Self {
        Self::new("badgestream", env!("CARGO_PKG_VERSION"))
    }
}

/// Leaf client that performs the actual network request
///
/// Never retries and never looks at the status code. Transport failures are
/// returned as [`NetworkError::Http`].
pub struct BaseClient<T = PooledTransport> {
    transport: T,
    user_agent: HeaderValue,
}

impl<T: TransportFactory> BaseClient<T> {
    /// Creates a base client issuing requests through `transport`
    pub fn new(transport: T, identity: &ServiceIdentity) -> NetworkResult<Self> {
        let user_agent = HeaderValue::from_str(&identity.user_agent())
            .map_err(|e| NetworkError::InvalidHeader(format!("user-agent: {}", e)))?;

        Ok(Self {
            transport,
            user_agent,
        })
    }

    /// Returns the `User-Agent` value sent with every request
    pub fn user_agent(&self) -> &HeaderValue {
        &self.user_agent
    }
}

#[async_trait]
impl<T: TransportFactory> ResilientClient for BaseClient<T> {
    async fn send(&self, factory: &dyn RequestFactory) -> NetworkResult<Response> {
        let (method, url, mut headers) = factory.build().into_parts();
        let client = self.transport.create_client()?;

        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.append(ACCEPT, HeaderValue::from_static("application/json"));

        log::debug!("{} {}", method, url);
        let response = client.request(method, url).headers(headers).send().await?;
        Ok(response)
    }
}
