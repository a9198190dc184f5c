//! Configuration manager - main API for config operations

use crate::persistence::ConfigPersistence;
use crate::{Config, ConfigError, ConfigResult};
use directories::ProjectDirs;
use std::path::PathBuf;
use std::str::FromStr;

/// Prefix for environment overrides
const ENV_PREFIX: &str = "BADGESTREAM";

/// Main configuration manager
///
/// This is the primary interface for loading, saving, and managing configuration.
/// It handles file paths, defaults, and validation.
pub struct ConfigManager {
    persistence: ConfigPersistence,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager using the default config directory
    ///
    /// The default directory follows the platform convention:
    /// - Linux: `~/.config/badgestream/`
    /// - macOS: `~/Library/Application Support/badgestream/`
    /// - Windows: `%APPDATA%\badgestream\`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = Self::default_config_dir()?;
        Self::with_directory(config_dir)
    }

    /// Creates a config manager with a custom config directory
    pub fn with_directory(config_dir: PathBuf) -> ConfigResult<Self> {
        let config_path = config_dir.join("config.toml");
        let persistence = ConfigPersistence::new(config_path);

        Ok(Self {
            persistence,
            config_dir,
        })
    }

    fn default_config_dir() -> ConfigResult<PathBuf> {
        ProjectDirs::from("", "", "badgestream")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Could not determine user config directory".to_string(),
            })
    }

    /// Returns the config directory path
    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    /// Returns the full config file path
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Loads the configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file is corrupted, returns an error.
    pub fn load(&self) -> ConfigResult<Config> {
        self.persistence.load()
    }

    /// Loads the configuration, falling back to defaults on any error
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}, using defaults", e);
                Config::default()
            }
        }
    }

    /// Saves the configuration to file
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.persistence.save(config)
    }

    /// Writes a default config file if one doesn't exist
    ///
    /// Returns Ok(true) if a new file was created, Ok(false) if one already exists.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::info!(
                "Config file already exists at {}",
                self.config_path().display()
            );
            return Ok(false);
        }

        self.persistence.generate_default()?;
        Ok(true)
    }

    /// Validates the current configuration file
    ///
    /// Returns all validation errors found, or an empty list if valid.
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        let config = self.load()?;

        match config.validate() {
            Ok(()) => Ok(Vec::new()),
            Err(errors) => Ok(errors.iter().map(|e| e.to_string()).collect()),
        }
    }

    /// Loads the config and applies environment variable overrides
    ///
    /// Variables follow the pattern `BADGESTREAM_SECTION_FIELD`, for example
    /// `BADGESTREAM_RESILIENCE_MAX_RETRIES=1`. Unparsable values are ignored
    /// with a warning.
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());

        if let Err(errors) = config.validate() {
            log::warn!(
                "Config validation warnings after env overrides: {:?}",
                errors
            );
        }

        Ok(config)
    }
}

/// Applies overrides looked up through `lookup`
pub(crate) fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |section: &str, field: &str| {
        let key = format!("{}_{}_{}", ENV_PREFIX, section, field);
        lookup(&key).map(|value| (key, value))
    };

    if let Some((_, name)) = var("HTTP", "SERVICE_NAME") {
        config.http.service_name = name;
    }
    if let Some((_, version)) = var("HTTP", "SERVICE_VERSION") {
        config.http.service_version = version;
    }
    override_parsed(&mut config.http.request_timeout_secs, var("HTTP", "REQUEST_TIMEOUT_SECS"));
    override_parsed(&mut config.http.connect_timeout_secs, var("HTTP", "CONNECT_TIMEOUT_SECS"));
    override_parsed(&mut config.http.max_redirects, var("HTTP", "MAX_REDIRECTS"));
    if let Some((key, value)) = var("HTTP", "CALL_DEADLINE_SECS") {
        let mut deadline = 0u64;
        if override_parsed(&mut deadline, Some((key, value))) {
            config.http.call_deadline_secs = Some(deadline);
        }
    }

    override_parsed(&mut config.resilience.max_retries, var("RESILIENCE", "MAX_RETRIES"));
    override_parsed(
        &mut config.resilience.min_break_duration_secs,
        var("RESILIENCE", "MIN_BREAK_DURATION_SECS"),
    );
    override_parsed(&mut config.resilience.backoff_unit_ms, var("RESILIENCE", "BACKOFF_UNIT_MS"));
}

fn override_parsed<T: FromStr>(target: &mut T, entry: Option<(String, String)>) -> bool {
    let Some((key, value)) = entry else {
        return false;
    };

    match value.trim().parse::<T>() {
        Ok(parsed) => {
            log::info!("Config override from {}", key);
            *target = parsed;
            true
        }
        Err(_) => {
            log::warn!("Ignoring unparsable value {:?} in {}", value, key);
            false
        }
    }
}
