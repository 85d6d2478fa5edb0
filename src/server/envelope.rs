//! Uniform JSON error envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    config::Platform,
    error::{FieldError, GatewayError},
};

/// Body returned for every failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Machine readable error kind (`validation_error`, `upstream_error`, ...)
    pub error: String,

    /// Human readable description
    pub detail: String,

    /// Offending fields, for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,

    /// Vendor answer, for upstream failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<UpstreamDetail>,
}

/// What the vendor answered, attached unmodified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamDetail {
    pub platform: Platform,
    pub status: u16,
    pub body: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: detail.into(),
            fields: None,
            upstream: None,
        }
    }
}

impl From<&GatewayError> for ErrorEnvelope {
    fn from(err: &GatewayError) -> Self {
        let mut envelope = Self::new(err.kind(), err.to_string());
        match err {
            GatewayError::Validation(fields) => envelope.fields = Some(fields.clone()),
            GatewayError::Upstream {
                platform,
                status,
                body,
            } => {
                envelope.upstream = Some(UpstreamDetail {
                    platform: *platform,
                    status: *status,
                    body: body.clone(),
                });
            }
            _ => {}
        }
        envelope
    }
}

/// HTTP status for an error
pub(crate) fn status_of(err: &GatewayError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (status_of(&self), Json(ErrorEnvelope::from(&self))).into_response()
    }
}
