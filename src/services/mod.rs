//! Platform adapters for the supported voice-agent vendors
//!
//! This module provides one adapter per platform:
//! - Vapi (`POST /assistants`)
//! - Retell (`POST /agents`)
//!
//! plus the [`AdapterRegistry`] that maps platform keys to adapters.

pub mod client;
pub mod registry;
pub mod retell;
pub mod vapi;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;

pub use self::{client::VendorClient, registry::AdapterRegistry};
use crate::{
    agents::{AgentRequest, AgentResponse},
    config::Platform,
    error::Result,
};

/// Core trait for platform adapters
///
/// An adapter translates the standardized request into the vendor's wire
/// format, performs the single vendor call, and translates the vendor's
/// answer back. Adapters hold only configuration, so one instance is shared
/// by every concurrent request.
#[async_trait]
pub trait AgentAdapter: Send + Sync {
    /// Platform this adapter talks to
    fn platform(&self) -> Platform;

    /// Build the vendor request body
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized
    fn translate_request(&self, request: &AgentRequest) -> Result<Value>;

    /// Send the vendor request body and return the vendor's JSON answer
    async fn call_remote(&self, payload: &Value) -> Result<Value>;

    /// Normalize the vendor's answer
    ///
    /// # Errors
    ///
    /// Returns [`crate::GatewayError::MalformedUpstream`] if the answer
    /// carries no agent id
    fn translate_response(&self, request: &AgentRequest, body: Value) -> Result<AgentResponse>;

    /// Create an agent: translate, call once, translate back
    async fn create_agent(&self, request: &AgentRequest) -> Result<AgentResponse> {
        let payload = self.translate_request(request)?;
        let body = self.call_remote(&payload).await?;
        let response = self.translate_response(request, body)?;
        info!(
            "Created {} agent '{}' with id {}",
            self.platform(),
            response.name,
            response.id
        );
        Ok(response)
    }
}

/// Merge `provider_specific` into a vendor payload; its keys override
pub(crate) fn apply_provider_specific(payload: &mut Value, extra: &Map<String, Value>) {
    if let Value::Object(fields) = payload {
        for (key, value) in extra {
            fields.insert(key.clone(), value.clone());
        }
    }
}
