//! Configuration management for unified-agents
//!
//! Implements a layered configuration system (later layers win):
//! 1. Built-in defaults
//! 2. JSON settings file (`--config` or `~/.config/unified-agents/config.json`)
//! 3. Environment variables (a `.env` file is loaded by the binary first)
//! 4. CLI parameters

pub mod platforms;
pub mod settings;

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

pub use self::{
    platforms::{Platform, PlatformSettings},
    settings::{PlatformTable, Settings},
};
use crate::error::{GatewayError, Result};

/// Default listen address
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Default timeout for a single vendor call
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Resolved configuration, constructed once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind: SocketAddr,

    /// Bound on each outbound vendor call
    pub request_timeout: Duration,

    /// Per-platform credentials and endpoints
    pub platforms: PlatformTable,

    /// Settings file the configuration was read from, if any
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the settings file and the environment
    ///
    /// An explicit `path` must exist; the default path is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or parsed, or if a
    /// value is malformed
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (mut settings, source) = match path {
            Some(path) => (Settings::load_from_path(path)?, Some(path.to_path_buf())),
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    (Settings::load_from_path(&default_path)?, Some(default_path))
                } else {
                    (Settings::default(), None)
                }
            }
        };

        settings.merge(Settings::from_env()?);

        let mut config = Self::from_settings(settings)?;
        config.source = source;
        Ok(config)
    }

    /// Resolve a merged settings layer into a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the bind address or timeout is invalid
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let bind_raw = settings.bind.as_deref().unwrap_or(DEFAULT_BIND);
        let bind = bind_raw.parse::<SocketAddr>().map_err(|_| {
            GatewayError::Configuration(format!("Invalid bind address: '{bind_raw}'"))
        })?;

        let timeout_secs = settings
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(GatewayError::Configuration(
                "request timeout must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            bind,
            request_timeout: Duration::from_secs(timeout_secs),
            platforms: settings.platforms,
            source: None,
        })
    }

    /// Get the configuration directory path
    #[must_use]
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("unified-agents")
    }

    /// Get the default settings file path
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Settings for one platform
    #[must_use]
    pub const fn platform(&self, platform: Platform) -> &PlatformSettings {
        self.platforms.get(platform)
    }

    /// Platforms that have no API key configured
    #[must_use]
    pub fn missing_credentials(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|platform| self.platform(*platform).api_key().is_none())
            .collect()
    }

    /// Fail unless every platform has an API key
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] naming each missing variable
    pub fn require_credentials(&self) -> Result<()> {
        let missing = self.missing_credentials();
        if missing.is_empty() {
            return Ok(());
        }

        let names = missing
            .iter()
            .map(Platform::api_key_env)
            .collect::<Vec<_>>()
            .join(", ");
        Err(GatewayError::Configuration(format!(
            "{names} not configured in environment"
        )))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: ([0, 0, 0, 0], 8000).into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            platforms: PlatformTable::default(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_keys(vapi: Option<&str>, retell: Option<&str>) -> Config {
        let mut config = Config::default();
        config.platforms.vapi.api_key = vapi.map(String::from);
        config.platforms.retell.api_key = retell.map(String::from);
        config
    }

    #[test]
    fn test_config_paths() {
        let path = Config::default_config_path();
        assert!(path.ends_with("unified-agents/config.json"));
    }

    #[test]
    fn test_from_settings_defaults() {
        let config = Config::from_settings(Settings::default()).unwrap();
        assert_eq!(config.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_from_settings_rejects_bad_bind() {
        let settings = Settings {
            bind: Some("localhost".into()),
            ..Settings::default()
        };
        let err = Config::from_settings(settings).unwrap_err();
        assert!(matches!(err, GatewayError::Configuration(_)));
    }

    #[test]
    fn test_from_settings_rejects_zero_timeout() {
        let settings = Settings {
            request_timeout_secs: Some(0),
            ..Settings::default()
        };
        assert!(Config::from_settings(settings).is_err());
    }

    #[test]
    fn test_require_credentials_names_missing_variables() {
        let err = with_keys(None, None).require_credentials().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("VAPI_API_KEY"));
        assert!(message.contains("RETELL_API_KEY"));
        assert!(message.contains("not configured"));

        let err = with_keys(Some("k"), None).require_credentials().unwrap_err();
        assert!(!err.to_string().contains("VAPI_API_KEY"));

        assert!(with_keys(Some("k"), Some("k")).require_credentials().is_ok());
    }
}
