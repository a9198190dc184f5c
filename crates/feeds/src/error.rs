// crates/feeds/src/error.rs
//! Feed error types

use badgestream_network::NetworkError;
use thiserror::Error;

/// Result type for feed operations
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors from building feed requests
#[derive(Error, Debug)]
pub enum FeedError {
    /// URL template could not be parsed
    #[error("Invalid URL template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// A placeholder had no value in the query
    #[error("No value for placeholder '{{{0}}}'")]
    MissingVariable(String),

    /// Expanded template is not a valid URL
    #[error("Invalid feed URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Authentication settings cannot be sent as a header
    #[error("Invalid authentication for feed '{feed}': {reason}")]
    InvalidAuth { feed: String, reason: String },

    /// No feed registered under this name
    #[error("Unknown feed: {0}")]
    UnknownFeed(String),

    /// Pipeline could not be created
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}
