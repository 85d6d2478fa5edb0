//! Field-by-field validation of raw agent-creation bodies

use serde_json::{Map, Value};

use super::{AgentRequest, Voice, VoiceProvider};
use crate::error::{FieldError, GatewayError, Result};

/// Collects field errors while a body is being walked
#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// First present key among `keys` (primary name, then aliases)
    fn lookup<'a>(body: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .find_map(|key| body.get(*key).filter(|value| !value.is_null()))
    }

    fn required_string(&mut self, body: &Map<String, Value>, keys: &[&str], field: &str) -> String {
        match Self::lookup(body, keys) {
            None => {
                self.fail(field, "field is required");
                String::new()
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.fail(field, "must not be empty");
                String::new()
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                self.fail(field, "must be a string");
                String::new()
            }
        }
    }

    fn optional_string(&mut self, body: &Map<String, Value>, key: &str) -> Option<String> {
        match Self::lookup(body, &[key]) {
            None => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.fail(key, "must be a string");
                None
            }
        }
    }

    fn optional_object(&mut self, body: &Map<String, Value>, field: &str) -> Map<String, Value> {
        match Self::lookup(body, &[field]) {
            None => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => {
                self.fail(field, "must be a JSON object");
                Map::new()
            }
        }
    }

    fn voice(&mut self, body: &Map<String, Value>) -> Option<Voice> {
        let voice = match Self::lookup(body, &["voice"]) {
            None => {
                self.fail("voice", "field is required");
                return None;
            }
            Some(Value::Object(voice)) => voice,
            Some(_) => {
                self.fail("voice", "must be a JSON object");
                return None;
            }
        };

        let provider = match voice.get("provider") {
            None | Some(Value::Null) => {
                self.fail("voice.provider", "field is required");
                None
            }
            Some(Value::String(name)) => match name.parse::<VoiceProvider>() {
                Ok(provider) => Some(provider),
                Err(message) => {
                    self.fail("voice.provider", message);
                    None
                }
            },
            Some(_) => {
                self.fail("voice.provider", "must be a string");
                None
            }
        };

        let voice_id = self.required_string(voice, &["voice_id"], "voice.voice_id");

        let settings = match voice.get("settings") {
            None | Some(Value::Null) => None,
            Some(Value::Object(settings)) => Some(settings.clone()),
            Some(_) => {
                self.fail("voice.settings", "must be a JSON object");
                None
            }
        };

        Some(Voice {
            provider: provider?,
            voice_id,
            settings,
        })
    }

    fn webhook_url(&mut self, body: &Map<String, Value>) -> Option<String> {
        let raw = self.optional_string(body, "webhook_url")?;
        match url::Url::parse(&raw) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(raw),
            Ok(_) => {
                self.fail("webhook_url", "must use http or https");
                None
            }
            Err(e) => {
                self.fail("webhook_url", format!("invalid URL: {e}"));
                None
            }
        }
    }
}

/// Validate `raw` into an [`AgentRequest`], reporting all field errors together
pub(super) fn validate(raw: &Value) -> Result<AgentRequest> {
    let Some(body) = raw.as_object() else {
        return Err(GatewayError::invalid_field(
            "body",
            "expected a JSON object",
        ));
    };

    let mut checker = Checker::default();

    let platform = checker.required_string(body, &["platform", "provider"], "platform");
    let name = checker.required_string(body, &["name"], "name");
    let instructions = checker.required_string(body, &["instructions", "system_prompt"], "instructions");
    let voice = checker.voice(body);

    let description = checker.optional_string(body, "description");
    let language = checker.optional_string(body, "language");
    let llm_model = checker.optional_string(body, "llm_model");
    let webhook_url = checker.webhook_url(body);
    let metadata = checker.optional_object(body, "metadata");
    let provider_specific = checker.optional_object(body, "provider_specific");

    match voice {
        Some(voice) if checker.errors.is_empty() => Ok(AgentRequest {
            platform,
            name,
            description,
            voice,
            instructions,
            language,
            llm_model,
            webhook_url,
            metadata,
            provider_specific,
        }),
        _ => Err(GatewayError::Validation(checker.errors)),
    }
}
