//! Standardized agent-creation request and response
//!
//! [`AgentRequest`] is the vendor-agnostic shape accepted by `POST /agents`.
//! It is built from raw JSON by [`AgentRequest::from_json`], which reports
//! every invalid field at once instead of stopping at the first one.
//! [`AgentResponse`] is the normalized echo returned after the vendor has
//! created the agent.

mod validation;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{config::Platform, error::Result};

/// Text-to-speech providers a voice can come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceProvider {
    ElevenLabs,
    Deepgram,
    PlayHt,
    OpenAi,
    Retell,
    AwsPolly,
    Google,
}

impl VoiceProvider {
    pub const ALL: [Self; 7] = [
        Self::ElevenLabs,
        Self::Deepgram,
        Self::PlayHt,
        Self::OpenAi,
        Self::Retell,
        Self::AwsPolly,
        Self::Google,
    ];

    /// Standardized name, as accepted in requests
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ElevenLabs => "eleven_labs",
            Self::Deepgram => "deepgram",
            Self::PlayHt => "play_ht",
            Self::OpenAi => "open_ai",
            Self::Retell => "retell",
            Self::AwsPolly => "aws_polly",
            Self::Google => "google",
        }
    }
}

impl std::str::FromStr for VoiceProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str() == wanted)
            .ok_or_else(|| {
                let known = Self::ALL.map(|p| p.as_str()).join(", ");
                format!("unknown voice provider '{s}' (expected one of: {known})")
            })
    }
}

/// Voice selection for an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub provider: VoiceProvider,

    pub voice_id: String,

    /// Provider-specific tuning (stability, similarity boost, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
}

/// Standardized agent-creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRequest {
    /// Platform key as sent by the caller; resolved by the adapter registry
    pub platform: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub voice: Voice,

    /// System prompt for the agent
    pub instructions: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// LLM backing the agent; each platform has its own default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,

    /// Extra vendor fields, merged into the vendor payload last
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub provider_specific: Map<String, Value>,
}

impl AgentRequest {
    /// Validate a raw JSON body into a request
    ///
    /// `provider` is accepted in place of `platform`, and `system_prompt` in
    /// place of `instructions`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GatewayError::Validation`] listing every missing or
    /// invalid field
    pub fn from_json(raw: &Value) -> Result<Self> {
        validation::validate(raw)
    }
}

/// Normalized response for a created agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Vendor-assigned agent id
    pub id: String,

    pub platform: Platform,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Untouched vendor response body
    pub vendor: Value,
}

impl AgentResponse {
    /// Build a response from a vendor body
    ///
    /// The id is read from the first of `id_keys` holding a string or number.
    /// Returns `None` when the body carries no id.
    #[must_use]
    pub fn from_vendor(
        platform: Platform,
        request: &AgentRequest,
        body: Value,
        id_keys: &[&str],
    ) -> Option<Self> {
        let id = id_keys.iter().find_map(|key| match body.get(key) {
            Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        })?;

        let name = ["name", "agent_name"]
            .iter()
            .find_map(|key| body.get(key).and_then(Value::as_str))
            .unwrap_or(request.name.as_str())
            .to_string();

        let created_at = ["created_at", "createdAt"]
            .iter()
            .find_map(|key| body.get(key).and_then(Value::as_str))
            .map(String::from);

        Some(Self {
            id,
            platform,
            name,
            created_at,
            vendor: body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request() -> AgentRequest {
        AgentRequest::from_json(&json!({
            "platform": "vapi",
            "name": "Customer Service Agent",
            "voice": { "provider": "eleven_labs", "voice_id": "rachel" },
            "instructions": "Be helpful."
        }))
        .unwrap()
    }

    #[test]
    fn test_voice_provider_from_str() {
        assert_eq!(
            "eleven_labs".parse::<VoiceProvider>().unwrap(),
            VoiceProvider::ElevenLabs
        );
        assert_eq!(
            "AWS_POLLY".parse::<VoiceProvider>().unwrap(),
            VoiceProvider::AwsPolly
        );
        let err = "elevenlabs".parse::<VoiceProvider>().unwrap_err();
        assert!(err.contains("eleven_labs"));
    }

    #[test]
    fn test_voice_provider_serde_matches_as_str() {
        for provider in VoiceProvider::ALL {
            assert_eq!(
                serde_json::to_value(provider).unwrap(),
                json!(provider.as_str())
            );
        }
    }

    #[test]
    fn test_response_from_vendor_body() {
        let request = sample_request();
        let body = json!({
            "id": "asst_123",
            "name": "Customer Service Agent",
            "createdAt": "2024-01-01T00:00:00Z"
        });

        let response =
            AgentResponse::from_vendor(Platform::Vapi, &request, body.clone(), &["id"]).unwrap();
        assert_eq!(response.id, "asst_123");
        assert_eq!(response.platform, Platform::Vapi);
        assert_eq!(response.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(response.vendor, body);
    }

    #[test]
    fn test_response_falls_back_to_secondary_id_and_request_name() {
        let request = sample_request();
        let body = json!({ "agent_id": "ag_9" });

        let response =
            AgentResponse::from_vendor(Platform::Retell, &request, body, &["id", "agent_id"])
                .unwrap();
        assert_eq!(response.id, "ag_9");
        assert_eq!(response.name, "Customer Service Agent");
        assert!(response.created_at.is_none());
    }

    #[test]
    fn test_response_without_id_is_none() {
        let request = sample_request();
        assert!(
            AgentResponse::from_vendor(Platform::Vapi, &request, json!({"id": ""}), &["id"])
                .is_none()
        );
        assert!(
            AgentResponse::from_vendor(Platform::Vapi, &request, json!([1, 2]), &["id"]).is_none()
        );
    }
}
