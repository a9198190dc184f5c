//! Config errors
//!
//! [`ConfigError`] covers everything that can stop a config file from being
//! read or written. Bad values inside a well-formed file are reported as
//! [`ValidationError`]s instead, so a service can still start on a config
//! with a typo in it.

use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot replace {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not valid config TOML: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("config cannot be written as TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Refused to save; holds every field problem joined with `; `
    #[error("refusing to save invalid config: {0}")]
    ValidationError(String),

    /// The file declares a format version this build does not know
    #[error("config format version {found} is newer than {supported}, upgrade badgestream")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("cannot create config directory {path}: {source}")]
    DirectoryCreationError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no config directory: {reason}")]
    PathResolutionError { reason: String },

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// One bad value, located by its dotted TOML path
///
/// Feed entries are indexed, e.g. `feeds[2].url_template`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    /// Offending value as written, when it is safe to echo back
    pub value: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    pub fn with_value(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Self::new(field, message)
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {} (found {:?})", self.field, self.message, value),
            None => write!(f, "{} {}", self.field, self.message),
        }
    }
}

impl std::error::Error for ValidationError {}
