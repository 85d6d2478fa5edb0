//! Supported voice-agent platforms and their per-platform settings

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Voice-agent platforms an agent can be created on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Vapi,
    Retell,
}

impl Platform {
    /// Every supported platform, in registration order
    pub const ALL: [Self; 2] = [Self::Vapi, Self::Retell];

    /// Key used on the wire (`platform` field, envelopes)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vapi => "vapi",
            Self::Retell => "retell",
        }
    }

    /// Get the default base URL for this platform
    #[must_use]
    pub const fn default_base_url(&self) -> &'static str {
        match self {
            Self::Vapi => "https://api.vapi.ai",
            Self::Retell => "https://api.retellai.com",
        }
    }

    /// Environment variable carrying the API key
    #[must_use]
    pub const fn api_key_env(&self) -> &'static str {
        match self {
            Self::Vapi => "VAPI_API_KEY",
            Self::Retell => "RETELL_API_KEY",
        }
    }

    /// Environment variable overriding the base URL
    #[must_use]
    pub const fn base_url_env(&self) -> &'static str {
        match self {
            Self::Vapi => "VAPI_BASE_URL",
            Self::Retell => "RETELL_BASE_URL",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vapi => write!(f, "Vapi"),
            Self::Retell => write!(f, "Retell"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vapi" => Ok(Self::Vapi),
            "retell" => Ok(Self::Retell),
            _ => Err(GatewayError::UnsupportedPlatform {
                platform: s.to_string(),
            }),
        }
    }
}

/// Credentials and endpoint for one platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSettings {
    /// API key sent as a bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom API endpoint (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl PlatformSettings {
    /// Get the effective base URL (custom or default), without a trailing slash
    #[must_use]
    pub fn effective_base_url(&self, platform: Platform) -> String {
        self.base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(platform.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// API key if one is configured and non-blank
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    /// Overlay `other` on top of `self`; set fields in `other` win
    pub fn merge(&mut self, other: Self) {
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
    }
}
