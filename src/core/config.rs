use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

use super::error::FixerError;

pub const FIXER_BASE_URL: &str = "https://data.fixer.io/api";
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// Converts a timeout in seconds to a `Duration`, rejecting non-positive values.
pub fn validate_timeout(secs: f64) -> std::result::Result<Duration, FixerError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(FixerError::InvalidConfiguration(
            "timeout must be positive".to_string(),
        ));
    }
    let timeout = Duration::try_from_secs_f64(secs)
        .map_err(|e| FixerError::InvalidConfiguration(format!("timeout out of range: {e}")))?;
    // Sub-nanosecond values round down to zero
    if timeout.is_zero() {
        return Err(FixerError::InvalidConfiguration(
            "timeout must be positive".to_string(),
        ));
    }
    Ok(timeout)
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: f64,
}

fn default_base_url() -> String {
    FIXER_BASE_URL.to_string()
}

fn default_timeout() -> f64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    #[serde(default)]
    pub fixer: ClientConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fxbook", "fxbook")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        validate_timeout(config.fixer.timeout)
            .with_context(|| format!("Invalid timeout in {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
