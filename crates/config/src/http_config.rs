//! Outbound HTTP configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the transport underneath every upstream pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    /// Service name sent in the `User-Agent` header
    pub service_name: String,

    /// Service version sent in the `User-Agent` header
    pub service_version: String,

    /// Whole-request timeout enforced by the transport, in seconds
    pub request_timeout_secs: u64,

    /// Connection establishment timeout, in seconds
    pub connect_timeout_secs: u64,

    /// Maximum redirects to follow
    pub max_redirects: usize,

    /// Optional deadline for one full pipeline call including retries
    pub call_deadline_secs: Option<u64>,
}

impl HttpConfig {
    /// Returns the request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the connect timeout as a duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the per-call deadline, if configured
    pub fn call_deadline(&self) -> Option<Duration> {
        self.call_deadline_secs.map(Duration::from_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            service_name: "badgestream".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
            max_redirects: 10,
            call_deadline_secs: None,
        }
    }
}

impl ConfigSection for HttpConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![
            Validator::not_empty(&self.service_name, "http.service_name"),
            Validator::not_empty(&self.service_version, "http.service_version"),
            Validator::in_range(self.request_timeout_secs, 1, 300, "http.request_timeout_secs"),
            Validator::in_range(self.connect_timeout_secs, 1, 60, "http.connect_timeout_secs"),
            Validator::in_range(self.max_redirects, 0, 20, "http.max_redirects"),
        ];

        if let Some(deadline) = self.call_deadline_secs {
            results.push(Validator::in_range(deadline, 1, 3600, "http.call_deadline_secs"));
        }

        if self.service_name.contains(char::is_whitespace) {
            results.push(Err(ValidationError::with_value(
                "http.service_name",
                "must not contain whitespace",
                &self.service_name,
            )));
        }

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.service_name = other.service_name;
        self.service_version = other.service_version;
        self.request_timeout_secs = other.request_timeout_secs;
        self.connect_timeout_secs = other.connect_timeout_secs;
        self.max_redirects = other.max_redirects;
        self.call_deadline_secs = other.call_deadline_secs;
    }

    fn section_name(&self) -> &'static str {
        "http"
    }
}
