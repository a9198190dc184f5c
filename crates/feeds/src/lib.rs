// crates/feeds/src/lib.rs
//! Upstream package and build feeds
//!
//! A feed is a URL template plus optional credentials. Lookups go through
//! the resilient pipeline from `badgestream-network` and never fail: an
//! upstream that cannot answer yields an empty string or `None`.
//!
//! ```rust
//! use badgestream_feeds::{FeedEndpoint, FeedQuery};
//!
//! let nuget = FeedEndpoint::new(
//!     "nuget",
//!     "https://azuresearch-usnc.nuget.org/query?q=packageid:{package}&prerelease={prerelease}",
//! )
//! .expect("valid template");
//!
//! let url = nuget
//!     .url_for(&FeedQuery::new("Serilog").with_prerelease(true))
//!     .expect("expands");
//! assert!(url.ends_with("packageid:Serilog&prerelease=true"));
//! ```

mod catalog;
mod client;
mod endpoint;
mod error;
mod template;

pub use catalog::{CatalogFeed, FeedCatalog};
pub use client::FeedClient;
pub use endpoint::{FeedAuth, FeedEndpoint, FeedQuery, PACKAGE_PLACEHOLDER, PRERELEASE_PLACEHOLDER};
pub use error::{FeedError, FeedResult};
pub use template::UrlTemplate;
