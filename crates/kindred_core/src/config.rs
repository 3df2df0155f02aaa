//! Configuration for hosts embedding the engine.
//!
//! Loaded from a TOML file (`kindred.toml` by default); every section falls
//! back to defaults so an empty file is a valid configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::db::DatabaseConfig;

pub const DEFAULT_CONFIG_FILE: &str = "kindred.toml";

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    #[diagnostic(
        code(kindred_core::config_read),
        help("Check that the file exists and is readable")
    )]
    Read {
        path: String,
        #[source]
        cause: std::io::Error,
    },

    #[error("Failed to parse config file {path}")]
    #[diagnostic(
        code(kindred_core::config_parse),
        help("Check the TOML syntax against the documented schema")
    )]
    Parse {
        path: String,
        #[source]
        cause: toml::de::Error,
    },

    #[error("Invalid configuration: {reason}")]
    #[diagnostic(code(kindred_core::config_invalid))]
    Invalid { reason: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KindredConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

/// Tunables of the search pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Upstream batch size; larger than one presentation needs so exclusion
    /// filtering is absorbed without extra round trips.
    pub page_size: usize,

    /// Photos shown per presentation.
    pub photo_limit: usize,

    /// Per-call budget for one upstream search, in seconds.
    pub upstream_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            photo_limit: 3,
            upstream_timeout_secs: 5,
        }
    }
}

impl SearchConfig {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

impl KindredConfig {
    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|cause| ConfigError::Read {
            path: path.display().to_string(),
            cause,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|cause| ConfigError::Parse {
            path: path.display().to_string(),
            cause,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the first config file found in the default locations, or fall
    /// back to defaults when none exists.
    pub fn discover() -> Result<Self, ConfigError> {
        for path in Self::default_paths() {
            if path.exists() {
                return Self::load(&path);
            }
        }
        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Candidate config locations: working directory first, then the user's
    /// config directory.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("kindred").join(DEFAULT_CONFIG_FILE));
        }
        paths
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.photo_limit == 0 {
            return Err(ConfigError::Invalid {
                reason: "search.photo_limit must be at least 1".to_string(),
            });
        }
        if self.search.page_size == 0 {
            return Err(ConfigError::Invalid {
                reason: "search.page_size must be at least 1".to_string(),
            });
        }
        if self.search.upstream_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                reason: "search.upstream_timeout_secs must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: KindredConfig = toml::from_str("").unwrap();
        assert_eq!(config.search.page_size, 25);
        assert_eq!(config.search.photo_limit, 3);
        assert!(matches!(
            config.database,
            DatabaseConfig::Embedded { ref path } if path == "./kindred.db"
        ));
    }

    #[test]
    fn sections_override_independently() {
        let config: KindredConfig = toml::from_str(
            r#"
            [database]
            type = "memory"

            [search]
            photo_limit = 5
            "#,
        )
        .unwrap();
        assert!(matches!(config.database, DatabaseConfig::Memory));
        assert_eq!(config.search.photo_limit, 5);
        assert_eq!(config.search.page_size, 25);
    }

    #[test]
    fn zero_photo_limit_is_rejected() {
        let config: KindredConfig = toml::from_str("[search]\nphoto_limit = 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
