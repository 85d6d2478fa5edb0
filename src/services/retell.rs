//! Retell adapter
//!
//! Creates agents through `POST {base_url}/agents`. Retell names voice
//! providers without separators (`elevenlabs`, `playht`, ...) and nests the
//! LLM selection under `llm`.

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
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// LLM provider Retell agents are created with
pub const DEFAULT_LLM_PROVIDER: &str = "openai";

const AGENTS_PATH: &str = "/agents";

/// Retell API adapter
#[derive(Debug, Clone)]
pub struct RetellAdapter {
    client: VendorClient,
}

impl RetellAdapter {
    /// Create a new Retell adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the base URL is invalid
    pub fn new(settings: &PlatformSettings, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: VendorClient::new(Platform::Retell, settings, timeout)?,
        })
    }
}

/// Map a standardized voice provider to Retell's name for it
#[must_use]
pub const fn voice_provider_name(provider: VoiceProvider) -> &'static str {
    match provider {
        VoiceProvider::ElevenLabs => "elevenlabs",
        VoiceProvider::Deepgram => "deepgram",
        VoiceProvider::PlayHt => "playht",
        VoiceProvider::OpenAi => "openai",
        VoiceProvider::Retell => "retell",
        VoiceProvider::AwsPolly => "polly",
        VoiceProvider::Google => "google",
    }
}

#[async_trait]
impl AgentAdapter for RetellAdapter {
    fn platform(&self) -> Platform {
        Platform::Retell
    }

    fn translate_request(&self, request: &AgentRequest) -> Result<Value> {
        let body = RetellAgentRequest {
            name: &request.name,
            llm: RetellLlm {
                provider: DEFAULT_LLM_PROVIDER,
                model: request.llm_model.as_deref().unwrap_or(DEFAULT_MODEL),
            },
            system_prompt: &request.instructions,
            metadata: &request.metadata,
            voice: RetellVoice {
                provider: voice_provider_name(request.voice.provider),
                voice_id: &request.voice.voice_id,
                settings: request.voice.settings.as_ref(),
            },
            description: request.description.as_deref(),
            webhook_url: request.webhook_url.as_deref(),
            language: request.language.as_deref(),
        };

        let mut payload = serde_json::to_value(body)?;
        apply_provider_specific(&mut payload, &request.provider_specific);
        Ok(payload)
    }

    async fn call_remote(&self, payload: &Value) -> Result<Value> {
        self.client.post_json(AGENTS_PATH, payload).await
    }

    fn translate_response(&self, request: &AgentRequest, body: Value) -> Result<AgentResponse> {
        AgentResponse::from_vendor(Platform::Retell, request, body, &["id", "agent_id"])
            .ok_or_else(|| GatewayError::MalformedUpstream {
                platform: Platform::Retell,
                message: "response has no agent id".to_string(),
            })
    }
}

// Retell API types

#[derive(Debug, Serialize)]
struct RetellAgentRequest<'a> {
    name: &'a str,
    llm: RetellLlm<'a>,
    system_prompt: &'a str,
    metadata: &'a Map<String, Value>,
    voice: RetellVoice<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    webhook_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct RetellLlm<'a> {
    provider: &'a str,
    model: &'a str,
}

#[derive(Debug, Serialize)]
struct RetellVoice<'a> {
    provider: &'a str,
    voice_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<&'a Map<String, Value>>,
}
