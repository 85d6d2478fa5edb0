//! Error types for unified-agents

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Platform;

/// Result type alias using [`GatewayError`]
pub type Result<T> = std::result::Result<T, GatewayError>;

/// A single invalid or missing request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending field (e.g. `voice.voice_id`)
    pub field: String,

    /// Human readable reason
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Main error type for unified-agents
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request body failed validation
    #[error("Request validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// Platform key has no registered adapter
    #[error("Unsupported platform: '{platform}'")]
    UnsupportedPlatform { platform: String },

    /// Vendor answered with a non-success status
    #[error("{platform} API error (HTTP {status}): {body}")]
    Upstream {
        platform: Platform,
        status: u16,
        body: String,
    },

    /// Vendor answered with success but the body is unusable
    #[error("{platform} API returned an unusable response: {message}")]
    MalformedUpstream { platform: Platform, message: String },

    /// Vendor did not answer within the configured timeout
    #[error("{platform} API did not respond in time")]
    UpstreamTimeout { platform: Platform },

    /// Vendor could not be reached
    #[error("{platform} API request failed: {message}")]
    Transport { platform: Platform, message: String },

    /// Missing or invalid configuration (credentials, URLs)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Settings file could not be read or parsed
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client error outside of a vendor call
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// Shorthand for a validation failure on a single field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Machine readable kind, used as the `error` member of the envelope
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::UnsupportedPlatform { .. } => "unsupported_platform",
            Self::Upstream { .. } | Self::MalformedUpstream { .. } => "upstream_error",
            Self::UpstreamTimeout { .. } => "upstream_timeout",
            Self::Transport { .. } | Self::Http(_) => "upstream_unreachable",
            Self::Configuration(_) | Self::ConfigParse { .. } => "configuration_error",
            Self::Io(_) | Self::Json(_) => "internal_error",
        }
    }

    /// HTTP status this error is reported with
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 422,
            Self::UnsupportedPlatform { .. } => 400,
            Self::Upstream { .. }
            | Self::MalformedUpstream { .. }
            | Self::Transport { .. }
            | Self::Http(_) => 502,
            Self::UpstreamTimeout { .. } => 504,
            Self::Configuration(_) | Self::ConfigParse { .. } | Self::Io(_) | Self::Json(_) => 500,
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
