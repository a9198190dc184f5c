//! BadgeStream Configuration System
//!
//! Settings for the upstream client pipeline and the feeds it talks to,
//! loaded from a TOML file.
//!
//! # Architecture
//!
//! - **Trait-based**: each section implements `ConfigSection`
//! - **Graceful degradation**: invalid values are reported as warnings on load
//! - **Atomic writes**: config files are never left half-written
//! - **Environment overrides**: `BADGESTREAM_<SECTION>_<FIELD>` beats the file
//!
//! # Example
//!
//! ```rust
//! use badgestream_config::Config;
//!
//! let config: Config = toml::from_str(r#"
//!     [resilience]
//!     max_retries = 2
//! "#).expect("valid TOML");
//!
//! assert_eq!(config.resilience.max_retries, 2);
//! assert_eq!(config.http.service_name, "badgestream");
//! ```

mod error;
mod feed_config;
mod http_config;
mod manager;
mod persistence;
mod resilience_config;
mod validation;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use feed_config::FeedConfig;
pub use http_config::HttpConfig;
pub use manager::ConfigManager;
pub use resilience_config::ResilienceConfig;
pub use validation::{ConfigSection, Validator};

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    /// Outbound HTTP settings
    pub http: HttpConfig,

    /// Retry and circuit breaker settings
    pub resilience: ResilienceConfig,

    /// Upstream feeds, one pipeline each
    pub feeds: Vec<FeedConfig>,
}

impl Config {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the entire configuration
    ///
    /// Returns all validation errors found across all sections.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(mut e) = self.http.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.resilience.validate() {
            errors.append(&mut e);
        }

        for (index, feed) in self.feeds.iter().enumerate() {
            if let Err(e) = feed.validate() {
                errors.extend(e.into_iter().map(|mut err| {
                    err.field = err.field.replacen("feeds.", &format!("feeds[{}].", index), 1);
                    err
                }));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for feed in &self.feeds {
            if !seen.insert(feed.name.as_str()) {
                errors.push(ValidationError::with_value(
                    "feeds.name",
                    "must be unique",
                    &feed.name,
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Merges this config with another, preferring values from `other`
    ///
    /// Feeds from `other` replace feeds with the same name and are appended
    /// otherwise.
    pub fn merge(&mut self, other: Config) {
        self.http.merge(other.http);
        self.resilience.merge(other.resilience);

        for feed in other.feeds {
            match self.feeds.iter_mut().find(|f| f.name == feed.name) {
                Some(existing) => existing.merge(feed),
                None => self.feeds.push(feed),
            }
        }
    }

    /// Looks up a feed by name
    pub fn feed(&self, name: &str) -> Option<&FeedConfig> {
        self.feeds.iter().find(|f| f.name == name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            http: HttpConfig::default(),
            resilience: ResilienceConfig::default(),
            feeds: Vec::new(),
        }
    }
}
