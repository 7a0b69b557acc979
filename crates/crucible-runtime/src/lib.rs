//! Crucible Runtime - manifest loading, layered configuration and host
//! orchestration for the Crucible service host.
//!
//! This crate provides:
//! - Service manifests and the typed [`ServiceRegistry`]
//! - Layered configuration (system layer deep-merged under the service's
//!   own config file) and the host's figment-based [`ConfigLoader`]
//! - [`ServiceHost`] keeping loaded instances and dispatching jobs
//! - Logging configuration
//!
//! # Loading a service
//!
//! ```rust,ignore
//! use crucible_runtime::{LoadOptions, ServiceHost, ServiceRegistry};
//!
//! let registry = ServiceRegistry::new();
//! registry.register(Arc::new(CaptchaFactory::new(recognizer))).await;
//!
//! let host = ServiceHost::new(registry);
//! host.load_from_dir("services/captcha", &LoadOptions::default()).await?;
//! host.run_until_shutdown().await;
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod loader;
pub mod logging;
pub mod manifest;
pub mod registry;

// Re-exports
pub use config::{
    ConfigError, ConfigLoader, ConfigResult, HostConfig, LogFormat, LogLevel, LoggingConfig,
    deep_merge, merge_layers,
};
pub use error::{
    LoadError, LoadResult, ManifestError, ManifestResult, RegistryError, RegistryResult,
};
pub use host::ServiceHost;
pub use loader::{LoadOptions, load_service, read_yaml_layer};
pub use manifest::{MANIFEST_FILE, ServiceManifest};
pub use registry::ServiceRegistry;

// Re-export tracing for use by embedding crates
pub use tracing;
