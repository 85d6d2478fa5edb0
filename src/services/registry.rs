//! Platform key → adapter lookup

use std::{collections::HashMap, sync::Arc};

use tracing::info;

use super::{retell::RetellAdapter, vapi::VapiAdapter, AgentAdapter};
use crate::{
    config::{Config, Platform},
    error::{GatewayError, Result},
};

/// Adapters by platform, filled once at startup and read-only afterwards
#[derive(Default, Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<Platform, Arc<dyn AgentAdapter>>,
}

impl AdapterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build adapters for every supported platform
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if any platform lacks credentials
    /// or has an invalid base URL
    pub fn from_config(config: &Config) -> Result<Self> {
        config.require_credentials()?;

        let mut registry = Self::new();
        for platform in Platform::ALL {
            let adapter: Arc<dyn AgentAdapter> = match platform {
                Platform::Vapi => Arc::new(VapiAdapter::new(
                    config.platform(platform),
                    config.request_timeout,
                )?),
                Platform::Retell => Arc::new(RetellAdapter::new(
                    config.platform(platform),
                    config.request_timeout,
                )?),
            };
            registry.register(adapter);
        }
        Ok(registry)
    }

    /// Register an adapter, replacing any previous one for its platform
    pub fn register(&mut self, adapter: Arc<dyn AgentAdapter>) {
        let platform = adapter.platform();
        info!("Registered {} adapter", platform);
        self.adapters.insert(platform, adapter);
    }

    /// Look up the adapter for a platform key
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnsupportedPlatform`] if the key names no
    /// registered platform
    pub fn resolve(&self, platform: &str) -> Result<Arc<dyn AgentAdapter>> {
        let key = platform.parse::<Platform>()?;
        self.adapters
            .get(&key)
            .cloned()
            .ok_or_else(|| GatewayError::UnsupportedPlatform {
                platform: platform.to_string(),
            })
    }

    /// Registered platforms, in declaration order
    #[must_use]
    pub fn platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|platform| self.adapters.contains_key(platform))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("platforms", &self.platforms())
            .finish()
    }
}
