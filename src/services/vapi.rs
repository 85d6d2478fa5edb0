//! Vapi adapter
//!
//! Creates assistants through `POST {base_url}/assistants`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{apply_provider_specific, AgentAdapter, VendorClient};
use crate::{
    agents::{AgentRequest, AgentResponse, VoiceProvider},
    config::{Platform, PlatformSettings},
    error::{GatewayError, Result},
};

/// Model used when the request does not name one
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-0125";

const ASSISTANTS_PATH: &str = "/assistants";

/// Vapi API adapter
#[derive(Debug, Clone)]
pub struct VapiAdapter {
    client: VendorClient,
}

impl VapiAdapter {
    /// Create a new Vapi adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the base URL is invalid
    pub fn new(settings: &PlatformSettings, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: VendorClient::new(Platform::Vapi, settings, timeout)?,
        })
    }
}

/// Vapi uses the standardized voice provider names unchanged
#[must_use]
pub const fn voice_provider_name(provider: VoiceProvider) -> &'static str {
    provider.as_str()
}

#[async_trait]
impl AgentAdapter for VapiAdapter {
    fn platform(&self) -> Platform {
        Platform::Vapi
    }

    fn translate_request(&self, request: &AgentRequest) -> Result<Value> {
        let body = VapiAssistantRequest {
            name: &request.name,
            model: request.llm_model.as_deref().unwrap_or(DEFAULT_MODEL),
            system_prompt: &request.instructions,
            metadata: &request.metadata,
            voice_id: &request.voice.voice_id,
            voice: VapiVoice {
                provider: voice_provider_name(request.voice.provider),
                settings: request.voice.settings.as_ref(),
            },
            description: request.description.as_deref(),
            webhook_url: request.webhook_url.as_deref(),
            transcriber: request
                .language
                .as_deref()
                .map(|language| VapiTranscriber { language }),
        };

        let mut payload = serde_json::to_value(body)?;
        apply_provider_specific(&mut payload, &request.provider_specific);
        Ok(payload)
    }

    async fn call_remote(&self, payload: &Value) -> Result<Value> {
        self.client.post_json(ASSISTANTS_PATH, payload).await
    }

    fn translate_response(&self, request: &AgentRequest, body: Value) -> Result<AgentResponse> {
        AgentResponse::from_vendor(Platform::Vapi, request, body, &["id"]).ok_or_else(|| {
            GatewayError::MalformedUpstream {
                platform: Platform::Vapi,
                message: "response has no assistant id".to_string(),
            }
        })
    }
}

// Vapi API types

#[derive(Debug, Serialize)]
struct VapiAssistantRequest<'a> {
    name: &'a str,
    model: &'a str,
    system_prompt: &'a str,
    metadata: &'a Map<String, Value>,
    voice_id: &'a str,
    voice: VapiVoice<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    webhook_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transcriber: Option<VapiTranscriber<'a>>,
}

#[derive(Debug, Serialize)]
struct VapiVoice<'a> {
    provider: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<&'a Map<String, Value>>,
}

#[derive(Debug, Serialize)]
struct VapiTranscriber<'a> {
    language: &'a str,
}
