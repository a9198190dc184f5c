// crates/feeds/src/endpoint.rs
//! Feed endpoints and the queries sent to them

use crate::error::{FeedError, FeedResult};
use crate::template::UrlTemplate;
use badgestream_config::FeedConfig;
use badgestream_network::OutboundRequest;
use reqwest::header::{HeaderName, HeaderValue};
use std::borrow::Cow;
use std::collections::BTreeMap;
use url::Url;

/// Placeholder filled with the package id
pub const PACKAGE_PLACEHOLDER: &str = "package";

/// Placeholder filled with `true` or `false`
pub const PRERELEASE_PLACEHOLDER: &str = "prerelease";

/// How a feed expects its credentials
#[derive(Debug, Clone)]
pub enum FeedAuth {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// Token in a custom header, e.g. `X-NuGet-ApiKey`
    Header { name: HeaderName, value: HeaderValue },
}

impl FeedAuth {
    /// Builds a custom-header credential
    pub fn header(name: &str, token: &str) -> Result<Self, String> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| e.to_string())?;
        let mut value = HeaderValue::from_str(token).map_err(|e| e.to_string())?;
        value.set_sensitive(true);
        Ok(FeedAuth::Header { name, value })
    }

    fn apply(&self, request: OutboundRequest) -> OutboundRequest {
        match self {
            FeedAuth::Bearer(token) => request.with_bearer_auth(token),
            FeedAuth::Header { name, value } => request.with_header(name.clone(), value.clone()),
        }
    }
}

/// What to look up on a feed
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub package: String,
    pub prerelease: Option<bool>,
    pub vars: BTreeMap<String, String>,
}

impl FeedQuery {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }

    /// Overrides the feed's pre-release default
    pub fn with_prerelease(mut self, include: bool) -> Self {
        self.prerelease = Some(include);
        self
    }

    /// Supplies a value for a custom placeholder
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

/// One upstream feed reached through a URL template
#[derive(Debug, Clone)]
pub struct FeedEndpoint {
    name: String,
    template: UrlTemplate,
    include_prerelease: bool,
    auth: Option<FeedAuth>,
}

impl FeedEndpoint {
    /// Creates an endpoint without authentication
    pub fn new(name: impl Into<String>, template: &str) -> FeedResult<Self> {
        Ok(Self {
            name: name.into(),
            template: UrlTemplate::parse(template)?,
            include_prerelease: false,
            auth: None,
        })
    }

    /// Creates an endpoint from its config section
    pub fn from_config(config: &FeedConfig) -> FeedResult<Self> {
        let endpoint = Self::new(config.name.clone(), &config.url_template)?
            .with_prerelease_default(config.include_prerelease);

        let auth = match (&config.auth_token, &config.auth_header) {
            (Some(token), Some(header)) => {
                Some(
                    FeedAuth::header(header, token).map_err(|reason| FeedError::InvalidAuth {
                        feed: config.name.clone(),
                        reason,
                    })?,
                )
            }
            (Some(token), None) => Some(FeedAuth::Bearer(token.clone())),
            (None, Some(_)) => {
                return Err(FeedError::InvalidAuth {
                    feed: config.name.clone(),
                    reason: "auth_header set without auth_token".to_string(),
                })
            }
            (None, None) => None,
        };

        Ok(match auth {
            Some(auth) => endpoint.with_auth(auth),
            None => endpoint,
        })
    }

    /// Sets whether queries include pre-releases unless they say otherwise
    pub fn with_prerelease_default(mut self, include: bool) -> Self {
        self.include_prerelease = include;
        self
    }

    /// Attaches credentials to every request
    pub fn with_auth(mut self, auth: FeedAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }

    /// Expands the template for `query`
    pub fn url_for(&self, query: &FeedQuery) -> FeedResult<String> {
        let prerelease = query.prerelease.unwrap_or(self.include_prerelease);

        let url = self.template.expand(|name| match name {
            PACKAGE_PLACEHOLDER => Some(Cow::Borrowed(query.package.as_str())),
            PRERELEASE_PLACEHOLDER => Some(Cow::Owned(prerelease.to_string())),
            other => query.vars.get(other).map(|v| Cow::Borrowed(v.as_str())),
        })?;

        Url::parse(&url).map_err(|e| FeedError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        Ok(url)
    }

    /// Builds the GET request for `query`, credentials included
    pub fn request_for(&self, query: &FeedQuery) -> FeedResult<OutboundRequest> {
        let request = OutboundRequest::get(self.url_for(query)?);
        Ok(match &self.auth {
            Some(auth) => auth.apply(request),
            None => request,
        })
    }
}
