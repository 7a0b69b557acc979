//! # Crucible
//!
//! A plugin-style host for expensive, rate-limited job services.
//!
//! ## Overview
//!
//! Crucible loads services from per-service directories (a manifest plus an
//! optional config override), merges their configuration over a shared
//! system layer, and dispatches jobs to them by name. The core kernel gives
//! every service the same protections around an expensive backend call:
//!
//! ```text
//! ┌──────────┐     ┌─────────────┐     ┌───────────────────────────────────┐
//! │   Host   │────▶│  Registry   │────▶│ Service "captcha"  (dedup cache,  │──▶ provider
//! │ (dispatch)│    │ (factories) │────▶│   admission gate, retry executor) │
//! └──────────┘     └─────────────┘────▶│ Service ...                       │──▶ ...
//!                                      └───────────────────────────────────┘
//! ```
//!
//! - **Host**: owns loaded services, dispatches jobs, handles shutdown
//! - **Registry**: maps manifest `service` keys to typed factories
//! - **Loader**: manifest discovery plus layered YAML configuration
//! - **Kernel**: [`DedupCache`], [`AdmissionGate`], [`run_with_retry`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crucible::prelude::*;
//! use crucible_captcha::CaptchaFactory;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = ServiceRegistry::new();
//!     registry.register(Arc::new(CaptchaFactory::new(provider))).await;
//!
//!     let host = ServiceHost::new(registry);
//!     host.load_from_dir("services/captcha", &LoadOptions::default()).await?;
//!
//!     let response = host.dispatch("captcha_service", job).await;
//!     Ok(())
//! }
//! ```
//!
//! [`DedupCache`]: crucible_core::DedupCache
//! [`AdmissionGate`]: crucible_core::AdmissionGate
//! [`run_with_retry`]: crucible_core::run_with_retry

pub use crucible_captcha as captcha;
pub use crucible_core as core;
pub use crucible_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use crucible::prelude::*;
/// ```
pub mod prelude {
    // Host orchestration - main entry points
    pub use crucible_runtime::{
        LoadOptions, ServiceHost, ServiceManifest, ServiceRegistry, load_service,
    };

    // Host configuration
    pub use crucible_runtime::config::{ConfigLoader, HostConfig, deep_merge};

    // Job model - the unit exchanged with services
    pub use crucible_core::{Job, JobResponse, JobService, ServiceFactory};

    // Kernel primitives for hand-built services
    pub use crucible_core::{
        AdmissionGate, DedupCache, GatePolicy, RetryPolicy, run_with_retry,
    };
}
