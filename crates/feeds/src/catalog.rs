// crates/feeds/src/catalog.rs
//! All configured feeds, each behind its own pipeline

use crate::client::FeedClient;
use crate::endpoint::{FeedEndpoint, FeedQuery};
use crate::error::{FeedError, FeedResult};
use badgestream_config::Config;
use badgestream_network::{PipelineConfig, UpstreamClient, UpstreamRegistry};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Client type used for configured feeds
pub type CatalogFeed = FeedClient<Arc<UpstreamClient>>;

/// Feeds by name
pub struct FeedCatalog {
    registry: UpstreamRegistry,
    feeds: HashMap<String, CatalogFeed>,
}

impl FeedCatalog {
    /// Creates an empty catalog whose pipelines use `config`
    pub fn new(config: PipelineConfig) -> FeedResult<Self> {
        Ok(Self {
            registry: UpstreamRegistry::new(config)?,
            feeds: HashMap::new(),
        })
    }

    /// Builds a catalog with every feed in `config`
    pub fn from_config(config: &Config) -> FeedResult<Self> {
        let mut catalog = Self::new(PipelineConfig::from(config))?;
        for feed in &config.feeds {
            catalog.register(FeedEndpoint::from_config(feed)?)?;
        }

        log::info!("Loaded {} feed(s)", catalog.len());
        Ok(catalog)
    }

    /// Adds `endpoint`, replacing a feed with the same name
    ///
    /// The pipeline is keyed by feed name, so a replaced feed keeps its
    /// circuit state.
    pub fn register(&mut self, endpoint: FeedEndpoint) -> FeedResult<()> {
        let pipeline = self.registry.get(endpoint.name())?;
        let name = endpoint.name().to_string();

        if self
            .feeds
            .insert(name.clone(), FeedClient::new(endpoint, pipeline))
            .is_some()
        {
            log::debug!("Replaced feed {}", name);
        }
        Ok(())
    }

    /// Looks up a feed by name
    pub fn get(&self, name: &str) -> FeedResult<&CatalogFeed> {
        self.feeds
            .get(name)
            .ok_or_else(|| FeedError::UnknownFeed(name.to_string()))
    }

    /// Returns feed names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.feeds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    /// Fetches `query` from the named feed
    pub async fn fetch_text(&self, feed: &str, query: &FeedQuery) -> FeedResult<String> {
        Ok(self.get(feed)?.fetch_text(query).await)
    }

    /// Fetches `query` from the named feed as JSON
    pub async fn fetch_json(&self, feed: &str, query: &FeedQuery) -> FeedResult<Option<Value>> {
        Ok(self.get(feed)?.fetch_json(query).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use badgestream_config::FeedConfig;

    fn config() -> Config {
        let mut config = Config::default();
        config.feeds.push(FeedConfig::new(
            "nuget",
            "https://api.nuget.org/v3/query?q={package}",
        ));
        config.feeds.push(FeedConfig::new(
            "myget",
            "https://www.myget.org/F/{feed}/api/v3/query?q={package}",
        ));
        config
    }

    #[test]
    fn test_from_config() {
        let catalog = FeedCatalog::from_config(&config()).expect("catalog");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.names(), ["myget", "nuget"]);
        assert_eq!(catalog.get("nuget").expect("feed").endpoint().name(), "nuget");
    }

    #[test]
    fn test_unknown_feed() {
        let catalog = FeedCatalog::from_config(&config()).expect("catalog");
        assert!(matches!(catalog.get("appveyor"), Err(FeedError::UnknownFeed(_))));
    }

    #[test]
    fn test_invalid_template_fails_catalog() {
        let mut config = config();
        config.feeds.push(FeedConfig::new("broken", "https://x/{package"));

        assert!(matches!(
            FeedCatalog::from_config(&config),
            Err(FeedError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_replacing_feed_keeps_pipeline() {
        let mut catalog = FeedCatalog::from_config(&config()).expect("catalog");
        let before = Arc::clone(catalog.get("nuget").expect("feed").fetcher());

        catalog
            .register(FeedEndpoint::new("nuget", "https://mirror.example/{package}").expect("valid"))
            .expect("registered");

        let after = catalog.get("nuget").expect("feed");
        assert!(Arc::ptr_eq(&before, after.fetcher()));
        assert_eq!(after.endpoint().template().as_str(), "https://mirror.example/{package}");
        assert_eq!(catalog.len(), 2);
    }
}
