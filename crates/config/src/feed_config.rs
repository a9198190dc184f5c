//! Upstream feed configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// One upstream feed reached through a URL template
///
/// Templates may use `{package}`, `{prerelease}` and any custom placeholder
/// supplied by the caller at query time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct FeedConfig {
    /// Unique feed name, e.g. "nuget"
    pub name: String,

    /// URL template, e.g. "https://api.example.org/query?q={package}"
    pub url_template: String,

    /// Include pre-release versions unless the query says otherwise
    pub include_prerelease: bool,

    /// Token sent with every request to this feed
    pub auth_token: Option<String>,

    /// Header carrying `auth_token`; bearer authorization when unset
    pub auth_header: Option<String>,
}

impl FeedConfig {
    /// Creates a feed without authentication
    pub fn new(name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            ..Self::default()
        }
    }
}

impl ConfigSection for FeedConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![
            Validator::not_empty(&self.name, "feeds.name"),
            Validator::http_url(&self.url_template, "feeds.url_template"),
        ];

        if let Some(header) = &self.auth_header {
            results.push(Validator::header_name(header, "feeds.auth_header"));
            if self.auth_token.is_none() {
                results.push(Err(ValidationError::new(
                    "feeds.auth_header",
                    "requires auth_token to be set",
                )));
            }
        }

        if let Some(token) = &self.auth_token {
            results.push(Validator::not_empty(token, "feeds.auth_token"));
        }

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.name = other.name;
        self.url_template = other.url_template;
        self.include_prerelease = other.include_prerelease;
        self.auth_token = other.auth_token;
        self.auth_header = other.auth_header;
    }

    fn section_name(&self) -> &'static str {
        "feeds"
    }
}
