//! Configuration
//!
//! Loaded from a TOML file. Every field has a default, so an empty or
//! missing file yields the stock SM-2 constants.
//!
//! ```toml
//! [scheduler]
//! default_ease_factor = 2.5
//! min_ease_factor = 1.3
//! interval_basis = "elapsed"   # or "scheduled"
//!
//! [review]
//! strict_quality = false
//!
//! [storage]
//! db_path = "/home/me/.local/share/lexicon/lexicon.db"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::review::ReviewPolicy;
use crate::sm2::SchedulerConfig;

/// Environment variable overriding `storage.db_path`
pub const DB_PATH_ENV: &str = "LEXICON_DB_PATH";

/// Config file name inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "lexicon.toml";

/// Configuration error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Values parse but make no sense together
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Database file; `None` means the platform data directory
    pub db_path: Option<PathBuf>,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub scheduler: SchedulerConfig,
    pub review: ReviewPolicy,
    pub storage: StorageConfig,
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or from the platform config file if it exists.
    ///
    /// An explicit path must exist; the platform file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let source = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&source)
    }

    /// `<config dir>/lexicon.toml` for this platform
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "lexicon", "lexicon")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Apply `LEXICON_DB_PATH` if set and non-empty
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup` instead of the process environment
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(DB_PATH_ENV).filter(|p| !p.is_empty()) {
            tracing::debug!("Database path overridden by {}", DB_PATH_ENV);
            self.storage.db_path = Some(PathBuf::from(path));
        }
        self
    }

    /// Reject ease settings the scheduler cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scheduler;
        if !s.min_ease_factor.is_finite() || s.min_ease_factor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_ease_factor must be a positive number, got {}",
                s.min_ease_factor
            )));
        }
        if !s.default_ease_factor.is_finite() || s.default_ease_factor < s.min_ease_factor {
            return Err(ConfigError::Invalid(format!(
                "default_ease_factor ({}) must be at least min_ease_factor ({})",
                s.default_ease_factor, s.min_ease_factor
            )));
        }
        Ok(())
    }
}
