// crates/network/src/request.rs
//! Outbound request descriptions and the factories that produce them

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Method;

/// Description of one outbound request
///
/// Holds everything needed to issue the call so that a factory can hand out
/// a fresh copy for every attempt.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    method: Method,
    url: String,
    headers: HeaderMap,
}

impl OutboundRequest {
    /// Creates a GET request for `url`
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Adds a header, replacing any previous value for the same name
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Adds `Authorization: Bearer <token>`
    ///
    /// Tokens that cannot be carried in a header are dropped with a warning.
    pub fn with_bearer_auth(self, token: &str) -> Self {
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.with_header(AUTHORIZATION, value)
            }
            Err(_) => {
                log::warn!("Ignoring bearer token that is not a valid header value");
                self
            }
        }
    }

    /// Returns the HTTP method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the target URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the request headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Splits the request into its parts
    pub fn into_parts(self) -> (Method, String, HeaderMap) {
        (self.method, self.url, self.headers)
    }
}

/// Produces a fresh [`OutboundRequest`] each time it is called
///
/// Every attempt of a call invokes the factory again, so implementations
/// must be repeatable.
pub trait RequestFactory: Send + Sync {
    /// Builds the request for one attempt
    fn build(&self) -> OutboundRequest;
}

impl<F> RequestFactory for F
where
    F: Fn() -> OutboundRequest + Send + Sync,
{
    fn build(&self) -> OutboundRequest {
        self()
    }
}

impl RequestFactory for OutboundRequest {
    fn build(&self) -> OutboundRequest {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_get_request() {
        let request = OutboundRequest::get("https://api.nuget.org/v3/index.json");
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.url(), "https://api.nuget.org/v3/index.json");
        assert!(request.headers().is_empty());
    }

    #[test]
    fn test_bearer_auth_is_sensitive() {
        let request = OutboundRequest::get("https://ci.example.com").with_bearer_auth("abc");

        let value = request.headers().get(AUTHORIZATION).expect("header set");
        assert_eq!(value, "Bearer abc");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_invalid_bearer_token_dropped() {
        let request = OutboundRequest::get("https://ci.example.com").with_bearer_auth("a\nb");
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_closure_factory_called_per_build() {
        let calls = AtomicUsize::new(0);
        let factory = || {
            calls.fetch_add(1, Ordering::SeqCst);
            OutboundRequest::get("https://example.com")
        };

        factory.build();
        factory.build();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_request_is_its_own_factory() {
        let request = OutboundRequest::get("https://example.com")
            .with_header(HeaderName::from_static("x-feed"), HeaderValue::from_static("nuget"));

        let built = request.build();
        assert_eq!(built.url(), request.url());
        assert_eq!(built.headers().get("x-feed").map(|v| v.as_bytes()), Some(&b"nuget"[..]));
    }
}
