//! Outbound HTTP client shared by the platform adapters

use std::time::Duration;

use reqwest::{header, Client};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::{Platform, PlatformSettings},
    error::{GatewayError, Result},
};

/// Authenticated JSON client for one vendor API
#[derive(Debug, Clone)]
pub struct VendorClient {
    client: Client,
    platform: Platform,
    base_url: String,
}

impl VendorClient {
    /// Create a client carrying the platform's bearer token
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if the API key is missing or
    /// cannot be sent as a header
    pub fn new(platform: Platform, settings: &PlatformSettings, timeout: Duration) -> Result<Self> {
        let api_key = settings.api_key().ok_or_else(|| {
            GatewayError::Configuration(format!(
                "{} not configured in environment",
                platform.api_key_env()
            ))
        })?;

        let base_url = settings.effective_base_url(platform);
        url::Url::parse(&base_url).map_err(|e| {
            GatewayError::Configuration(format!("Invalid {platform} base URL '{base_url}': {e}"))
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .default_headers({
                let mut headers = header::HeaderMap::new();
                let mut auth = header::HeaderValue::from_str(&format!("Bearer {api_key}"))
                    .map_err(|_| {
                        GatewayError::Configuration(format!(
                            "Invalid {} format",
                            platform.api_key_env()
                        ))
                    })?;
                auth.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, auth);
                headers
            })
            .build()?;

        Ok(Self {
            client,
            platform,
            base_url,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `payload` to `{base_url}{path}` and return the parsed JSON body
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Upstream`] for a non-success status, body kept verbatim
    /// - [`GatewayError::UpstreamTimeout`] when the timeout elapses
    /// - [`GatewayError::Transport`] when the vendor cannot be reached
    /// - [`GatewayError::MalformedUpstream`] when a success body is not JSON
    pub async fn post_json(&self, path: &str, payload: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {} ({})", url, self.platform);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            warn!("{} API returned HTTP {}", self.platform, status.as_u16());
            // UTF-8 bodies pass through unchanged; invalid sequences become U+FFFD
            return Err(GatewayError::Upstream {
                platform: self.platform,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(GatewayError::MalformedUpstream {
                platform: self.platform,
                message: "empty response body".to_string(),
            });
        }

        serde_json::from_slice(&body).map_err(|e| GatewayError::MalformedUpstream {
            platform: self.platform,
            message: format!("response is not JSON: {e}"),
        })
    }

    fn transport_error(&self, error: &reqwest::Error) -> GatewayError {
        if error.is_timeout() {
            warn!("{} API timed out", self.platform);
            GatewayError::UpstreamTimeout {
                platform: self.platform,
            }
        } else {
            warn!("{} API request failed: {}", self.platform, error);
            GatewayError::Transport {
                platform: self.platform,
                message: error.to_string(),
            }
        }
    }
}
