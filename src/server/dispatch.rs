//! Dispatch handler: validate → resolve → invoke → respond

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::envelope::{status_of, ErrorEnvelope};
use crate::{
    agents::{AgentRequest, AgentResponse},
    error::Result,
    services::AdapterRegistry,
};

/// Outcome of one create request, with the status it is reported under
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchReply {
    Created(AgentResponse),
    Failed {
        status: StatusCode,
        envelope: ErrorEnvelope,
    },
}

impl DispatchReply {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Created(_) => StatusCode::CREATED,
            Self::Failed { status, .. } => *status,
        }
    }
}

impl IntoResponse for DispatchReply {
    fn into_response(self) -> Response {
        match self {
            Self::Created(agent) => (StatusCode::CREATED, Json(agent)).into_response(),
            Self::Failed { status, envelope } => (status, Json(envelope)).into_response(),
        }
    }
}

/// Routes standardized requests to the registered platform adapters
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: AdapterRegistry,
}

impl Dispatcher {
    #[must_use]
    pub const fn new(registry: AdapterRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub const fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Validate, resolve and invoke; every step is terminal on failure
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error
    pub async fn create(&self, raw: &Value) -> Result<AgentResponse> {
        let request = AgentRequest::from_json(raw)?;
        let adapter = self.registry.resolve(&request.platform)?;
        adapter.create_agent(&request).await
    }

    /// Handle a create request, converting every failure into an envelope
    pub async fn handle_create(&self, raw: &Value) -> DispatchReply {
        let request_id = Uuid::new_v4();
        let span = info_span!("create_agent", %request_id);

        async {
            match self.create(raw).await {
                Ok(agent) => {
                    info!("Agent {} created on {}", agent.id, agent.platform);
                    DispatchReply::Created(agent)
                }
                Err(err) => {
                    let status = status_of(&err);
                    warn!("Create request failed with {}: {}", status.as_u16(), err);
                    DispatchReply::Failed {
                        status,
                        envelope: ErrorEnvelope::from(&err),
                    }
                }
            }
        }
        .instrument(span)
        .await
    }
}
