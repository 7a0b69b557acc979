//! Service host: owns loaded service instances and dispatches jobs to them.
//!
//! The external message bus is not part of this crate; whatever sits at the
//! boundary converts bus messages into [`Job`]s and calls
//! [`dispatch`](ServiceHost::dispatch). Dispatch never panics and never
//! returns an error type — an unknown service name produces a structured
//! error response, matching the contract that every job gets a response
//! mapping.

use std::collections::HashMap;
use std::path::Path;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::LoadResult;
use crate::loader::{LoadOptions, load_service};
use crate::registry::ServiceRegistry;
use crucible_core::{BoxedService, Job, JobResponse};

/// Holds the registry and all loaded service instances.
pub struct ServiceHost {
    registry: ServiceRegistry,
    services: RwLock<HashMap<String, BoxedService>>,
    shutdown: CancellationToken,
}

impl ServiceHost {
    /// Creates a host around an already-populated registry.
    pub fn new(registry: ServiceRegistry) -> Self {
        Self {
            registry,
            services: RwLock::new(HashMap::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// The factory registry services are built from.
    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Loads the service described by `service_dir` and keeps the instance.
    ///
    /// Returns the instance name the service was registered under.
    pub async fn load_from_dir(
        &self,
        service_dir: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> LoadResult<String> {
        let service = load_service(&self.registry, service_dir, options).await?;
        let name = service.name().to_string();
        self.insert(service).await;
        Ok(name)
    }

    /// Loads every listed service directory, failing on the first error.
    ///
    /// Returns the instance names in the same order as the directories.
    pub async fn load_all(
        &self,
        service_dirs: &[std::path::PathBuf],
        options: &LoadOptions,
    ) -> LoadResult<Vec<String>> {
        futures::future::try_join_all(
            service_dirs
                .iter()
                .map(|dir| self.load_from_dir(dir, options)),
        )
        .await
    }

    /// Inserts an already-built service instance.
    pub async fn insert(&self, service: BoxedService) {
        let name = service.name().to_string();
        let mut services = self.services.write().await;
        services.insert(name.clone(), service);
        debug!(service = %name, "service registered with host");
    }

    /// Dispatches one job to the named service.
    pub async fn dispatch(&self, service_name: &str, job: Job) -> JobResponse {
        let service = {
            let services = self.services.read().await;
            services.get(service_name).cloned()
        };
        match service {
            Some(service) => service.handle(job).await,
            None => JobResponse::error(job.topic, format!("unknown service: {service_name}")),
        }
    }

    /// Names of all loaded services.
    pub async fn service_names(&self) -> Vec<String> {
        let services = self.services.read().await;
        services.keys().cloned().collect()
    }

    /// Returns a service instance by name.
    pub async fn get(&self, service_name: &str) -> Option<BoxedService> {
        let services = self.services.read().await;
        services.get(service_name).cloned()
    }

    /// Token cancelled when [`shutdown`](Self::shutdown) is called.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Requests shutdown of [`run_until_shutdown`](Self::run_until_shutdown).
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Blocks until Ctrl-C or a [`shutdown`](Self::shutdown) request.
    pub async fn run_until_shutdown(&self) {
        let names = self.service_names().await;
        info!(services = ?names, "host running");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl-C, shutting down");
            }
            _ = self.shutdown.cancelled() => {
                info!("shutdown requested");
            }
        }
    }
}
