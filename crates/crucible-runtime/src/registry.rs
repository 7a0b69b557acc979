//! Typed service registry.
//!
//! Maps a declared service type identifier (the manifest's `service` field)
//! to the [`ServiceFactory`] that builds it. Factories are registered at
//! startup; manifests then select behavior by key.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{RegistryError, RegistryResult};
use crucible_core::{BoxedService, ServiceFactory};

/// Registry of service factories, keyed by service type.
pub struct ServiceRegistry {
    factories: RwLock<HashMap<String, Arc<dyn ServiceFactory>>>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a factory under its declared service type.
    ///
    /// Registering the same type twice replaces the earlier factory; the
    /// last registration wins.
    pub async fn register(&self, factory: Arc<dyn ServiceFactory>) {
        let service_type = factory.service_type().to_string();
        let mut factories = self.factories.write().await;
        if factories.insert(service_type.clone(), factory).is_some() {
            warn!(
                service_type = %service_type,
                "duplicate service factory registration, last wins"
            );
        } else {
            debug!(service_type = %service_type, "registered service factory");
        }
    }

    /// Builds a service instance of `service_type` named `name` from its
    /// merged configuration.
    pub async fn build(
        &self,
        service_type: &str,
        name: &str,
        config: &Value,
    ) -> RegistryResult<BoxedService> {
        let factory = {
            let factories = self.factories.read().await;
            factories.get(service_type).cloned()
        };
        let Some(factory) = factory else {
            return Err(RegistryError::UnknownServiceType {
                service_type: service_type.to_string(),
                registered: self.service_types().await,
            });
        };
        Ok(factory.build(name, config).await?)
    }

    /// Returns all registered service type keys.
    pub async fn service_types(&self) -> Vec<String> {
        let factories = self.factories.read().await;
        factories.keys().cloned().collect()
    }

    /// Returns `true` when a factory is registered for `service_type`.
    pub async fn contains(&self, service_type: &str) -> bool {
        let factories = self.factories.read().await;
        factories.contains_key(service_type)
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
