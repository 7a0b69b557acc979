//! Runtime error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crucible_core::ServiceError;

/// Errors produced while reading a service manifest.
///
/// All of these are fatal at load time: there is no partial or fallback
/// instantiation.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// No manifest file at the expected location.
    #[error("manifest not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read the manifest file.
    #[error("failed to read manifest: {0}")]
    Read(#[from] std::io::Error),

    /// The manifest is not valid YAML.
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A required manifest field is missing.
    #[error("missing required manifest field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },
}

/// Errors produced by the service registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The manifest names a service type no factory was registered for.
    #[error("unknown service type '{service_type}' (registered: {registered:?})")]
    UnknownServiceType {
        /// The requested registry key.
        service_type: String,
        /// The keys that are registered.
        registered: Vec<String>,
    },

    /// The factory failed to build the service.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Errors produced while loading a service from its directory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Manifest reading or validation failed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// A configuration layer could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The registry could not build the service.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for service loading.
pub type LoadResult<T> = Result<T, LoadError>;
