//! Fetches one package from a configured feed
//!
//! ```text
//! RUST_LOG=debug cargo run -p badgestream-feeds --example fetch_feed -- nuget Serilog
//! ```
//!
//! Uses the config file from the default location, falling back to a
//! built-in NuGet feed when none is configured.

use badgestream_config::{ConfigManager, FeedConfig};
use badgestream_feeds::{FeedCatalog, FeedQuery};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let feed = args.next().unwrap_or_else(|| "nuget".to_string());
    let package = args.next().unwrap_or_else(|| "Newtonsoft.Json".to_string());

    let manager = ConfigManager::new()?;
    let mut config = manager.load_with_env_overrides()?;
    if config.feeds.is_empty() {
        config.feeds.push(FeedConfig::new(
            "nuget",
            "https://azuresearch-usnc.nuget.org/query?q=packageid:{package}&prerelease={prerelease}",
        ));
    }

    let catalog = FeedCatalog::from_config(&config)?;
    println!("Feeds: {}", catalog.names().join(", "));

    match catalog.fetch_json(&feed, &FeedQuery::new(&package)).await? {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => println!("No data for {} on {}", package, feed),
    }

    Ok(())
}
