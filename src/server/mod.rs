//! HTTP server — Axum router exposing the agent-creation endpoint
//!
//! Endpoints:
//! - `POST /agents`     — create an agent on the requested platform
//! - `POST /api/agents` — same handler, kept for existing clients
//! - `GET  /`           — service information
//! - `GET  /health`     — liveness and registered platforms
//!
//! Every failure, including unknown routes, wrong methods, oversized and
//! undecodable bodies, is answered with an [`ErrorEnvelope`].

pub mod dispatch;
pub mod envelope;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub use self::{
    dispatch::{DispatchReply, Dispatcher},
    envelope::{ErrorEnvelope, UpstreamDetail},
};
use crate::error::{GatewayError, Result};

/// Service name reported by `GET /`
pub const SERVICE_NAME: &str = "Unified AI Agent API";

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// The API server
pub struct ApiServer {
    dispatcher: Arc<Dispatcher>,
    bind: SocketAddr,
}

impl ApiServer {
    #[must_use]
    pub fn new(bind: SocketAddr, dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            bind,
        }
    }

    /// Build the Axum router
    pub fn router(&self) -> Router {
        router(self.dispatcher.clone())
    }

    /// Start the server (blocks until Ctrl+C or SIGTERM)
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or serving fails
    pub async fn run(self) -> Result<()> {
        let router = self.router();
        let listener = TcpListener::bind(self.bind).await?;
        info!("Listening on http://{}", listener.local_addr()?);
        for platform in self.dispatcher.registry().platforms() {
            info!("  POST /agents  platform={}", platform.as_str());
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server shut down");
        Ok(())
    }
}

/// Build the router around a shared dispatcher
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/", get(root_handler).fallback(method_not_allowed_handler))
        .route("/health", get(health_handler).fallback(method_not_allowed_handler))
        .route("/agents", post(create_agent_handler).fallback(method_not_allowed_handler))
        .route("/api/agents", post(create_agent_handler).fallback(method_not_allowed_handler))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(dispatcher)
}

// ── HTTP Handlers ──

async fn create_agent_handler(
    State(dispatcher): State<Arc<Dispatcher>>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return body_rejection_response(&rejection),
    };

    let raw: Value = match serde_json::from_slice(&body) {
        Ok(raw) => raw,
        Err(e) => {
            return GatewayError::invalid_field("body", format!("invalid JSON: {e}"))
                .into_response()
        }
    };

    dispatcher.handle_create(&raw).await.into_response()
}

async fn root_handler(State(dispatcher): State<Arc<Dispatcher>>) -> impl IntoResponse {
    let platforms: Vec<&str> = dispatcher
        .registry()
        .platforms()
        .iter()
        .map(|platform| platform.as_str())
        .collect();

    Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "A unified API wrapper for Vapi and Retell voice agents",
        "endpoints": {
            "create_agent": "/agents",
            "health": "/health",
        },
        "platforms": platforms,
    }))
}

async fn health_handler(State(dispatcher): State<Arc<Dispatcher>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "platforms": dispatcher.registry().platforms(),
    }))
}

async fn not_found_handler(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorEnvelope::new(
            "not_found",
            format!("No route for {}", uri.path()),
        )),
    )
}

async fn method_not_allowed_handler(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorEnvelope::new(
            "method_not_allowed",
            format!("{} is not supported on {}", method, uri.path()),
        )),
    )
}

fn body_rejection_response(rejection: &BytesRejection) -> Response {
    let status = rejection.status();
    let kind = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "payload_too_large"
    } else {
        "invalid_body"
    };
    (status, Json(ErrorEnvelope::new(kind, rejection.body_text()))).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = terminate => info!("Received SIGTERM signal"),
    }
}
