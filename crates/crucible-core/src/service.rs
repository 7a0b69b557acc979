//! Service and factory traits: the seam between the host and its plugins.
//!
//! A [`JobService`] is one loaded plugin instance. Its [`handle`] method is
//! the whole job-level contract: it always returns a [`JobResponse`] — every
//! failure mode (validation, admission timeout, retry exhaustion, anything
//! unexpected) is converted into a structured error response, and nothing
//! escapes to crash the dispatching task.
//!
//! A [`ServiceFactory`] is one entry in the typed plugin registry: a manifest
//! names a `service` type identifier, the registry maps it to the factory,
//! and the factory builds the instance from the merged configuration. This
//! replaces loading code from a filesystem path at runtime while keeping
//! "configure behavior via data".
//!
//! [`handle`]: JobService::handle

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ServiceResult;
use crate::job::{Job, JobResponse};

/// A shared, ready-to-run service instance.
pub type BoxedService = Arc<dyn JobService>;

/// A loaded service that processes externally-triggered jobs.
#[async_trait]
pub trait JobService: Send + Sync {
    /// The instance name this service was loaded under.
    fn name(&self) -> &str;

    /// Processes one job to completion.
    ///
    /// Must be safe to call concurrently from multiple dispatching tasks;
    /// any internal throttling is the service's own concern.
    async fn handle(&self, job: Job) -> JobResponse;
}

/// Factory for one service type, registered under a stable identifier.
#[async_trait]
pub trait ServiceFactory: Send + Sync {
    /// The registry key manifests refer to (e.g. `"captcha"`).
    fn service_type(&self) -> &'static str;

    /// Builds a service instance from its merged configuration.
    ///
    /// `config` is the result of layering the system configuration under
    /// the service's own configuration file; unknown keys are ignored.
    async fn build(&self, name: &str, config: &Value) -> ServiceResult<BoxedService>;
}
