//! Command implementations

use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use serde_json::Value;
use tracing::info;

use crate::{
    config::{Config, Platform},
    error::{GatewayError, Result},
    server::{ApiServer, DispatchReply, Dispatcher},
    services::AdapterRegistry,
};

/// Run the HTTP server until shutdown
///
/// # Errors
///
/// Returns an error if credentials are missing or the server fails
pub async fn serve(config: &Config) -> Result<()> {
    if let Some(source) = &config.source {
        info!("Loaded settings from {}", source.display());
    }
    let registry = AdapterRegistry::from_config(config)?;
    ApiServer::new(config.bind, Dispatcher::new(registry))
        .run()
        .await
}

/// Dispatch a single request body read from `file` and print the reply
///
/// Returns whether the agent was created.
///
/// # Errors
///
/// Returns an error if the file cannot be read or credentials are missing
pub async fn create(config: &Config, file: &Path) -> Result<bool> {
    let contents = if file == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(file)?
    };

    let registry = AdapterRegistry::from_config(config)?;
    let dispatcher = Dispatcher::new(registry);

    let reply = match serde_json::from_str::<Value>(&contents) {
        Ok(raw) => dispatcher.handle_create(&raw).await,
        Err(e) => {
            let err = GatewayError::invalid_field("body", format!("invalid JSON: {e}"));
            DispatchReply::Failed {
                status: crate::server::envelope::status_of(&err),
                envelope: (&err).into(),
            }
        }
    };

    let created = matches!(reply, DispatchReply::Created(_));
    let output = match &reply {
        DispatchReply::Created(agent) => serde_json::to_string_pretty(agent)?,
        DispatchReply::Failed { envelope, .. } => serde_json::to_string_pretty(envelope)?,
    };
    println!("{output}");
    Ok(created)
}

/// Describe the resolved configuration
#[must_use]
pub fn describe_config(config: &Config) -> String {
    let mut lines = vec![
        format!(
            "settings file: {}",
            config
                .source
                .as_ref()
                .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
        ),
        format!("bind: {}", config.bind),
        format!("request timeout: {}s", config.request_timeout.as_secs()),
    ];

    for platform in Platform::ALL {
        let settings = config.platform(platform);
        let key_state = match settings.api_key() {
            Some(key) => format!("set ({})", mask(key)),
            None => format!("missing ({})", platform.api_key_env()),
        };
        lines.push(format!(
            "{}: base_url={} api_key={}",
            platform.as_str(),
            settings.effective_base_url(platform),
            key_state
        ));
    }

    lines.join("\n")
}

/// Print the resolved configuration and fail if credentials are missing
///
/// # Errors
///
/// Returns [`GatewayError::Configuration`] naming each missing variable
pub fn check_config(config: &Config) -> Result<()> {
    println!("{}", describe_config(config));
    config.require_credentials()
}

fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
