//! Settings layers: JSON settings file and environment variables

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use super::{Platform, PlatformSettings};
use crate::error::{GatewayError, Result};

/// Environment variable overriding the listen address
pub const BIND_ENV: &str = "UNIFIED_AGENTS_BIND";

/// Environment variable overriding the vendor request timeout
pub const TIMEOUT_ENV: &str = "UNIFIED_AGENTS_TIMEOUT_SECS";

/// One settings layer; unset fields fall through to the layer below
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Listen address (e.g. `0.0.0.0:8000`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    /// Timeout for a single vendor call, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Per-platform credentials and endpoints
    #[serde(default)]
    pub platforms: PlatformTable,
}

/// Settings for every supported platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformTable {
    #[serde(default)]
    pub vapi: PlatformSettings,

    #[serde(default)]
    pub retell: PlatformSettings,
}

impl PlatformTable {
    #[must_use]
    pub const fn get(&self, platform: Platform) -> &PlatformSettings {
        match platform {
            Platform::Vapi => &self.vapi,
            Platform::Retell => &self.retell,
        }
    }

    pub fn get_mut(&mut self, platform: Platform) -> &mut PlatformSettings {
        match platform {
            Platform::Vapi => &mut self.vapi,
            Platform::Retell => &mut self.retell,
        }
    }
}

impl Settings {
    /// Load a settings layer from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| GatewayError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&contents).map_err(|e| GatewayError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Build a settings layer from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a settings layer from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let request_timeout_secs = match non_blank(TIMEOUT_ENV) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                GatewayError::Configuration(format!(
                    "{TIMEOUT_ENV} must be a whole number of seconds, got '{raw}'"
                ))
            })?),
            None => None,
        };

        let mut platforms = PlatformTable::default();
        for platform in Platform::ALL {
            let entry = platforms.get_mut(platform);
            entry.api_key = non_blank(platform.api_key_env());
            entry.base_url = non_blank(platform.base_url_env());
        }

        Ok(Self {
            bind: non_blank(BIND_ENV),
            request_timeout_secs,
            platforms,
        })
    }

    /// Overlay `other` on top of `self`; set fields in `other` win
    pub fn merge(&mut self, other: Self) {
        if other.bind.is_some() {
            self.bind = other.bind;
        }
        if other.request_timeout_secs.is_some() {
            self.request_timeout_secs = other.request_timeout_secs;
        }
        self.platforms.vapi.merge(other.platforms.vapi);
        self.platforms.retell.merge(other.platforms.retell);
    }
}
