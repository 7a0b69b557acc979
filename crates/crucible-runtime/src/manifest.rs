//! Service manifests.
//!
//! Each service directory carries a `manifest.yaml` naming the service
//! instance and the registry key of its implementation, plus an optional
//! reference to the service's own configuration file:
//!
//! ```yaml
//! name: captcha_service
//! service: captcha
//! config_file: config.yaml
//! ```
//!
//! The `service` field is a typed-registry key resolved through
//! [`ServiceRegistry`](crate::registry::ServiceRegistry); behavior is still
//! configured via data, but no code is loaded from the filesystem at
//! runtime.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ManifestError, ManifestResult};

/// File name of the per-service manifest.
pub const MANIFEST_FILE: &str = "manifest.yaml";

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    config_file: Option<PathBuf>,
}

/// A validated service descriptor. Read once at startup, never mutated.
#[derive(Debug, Clone)]
pub struct ServiceManifest {
    /// Instance name the service is loaded under.
    pub name: String,
    /// Registry key of the service implementation.
    pub service: String,
    /// Optional config file path, relative to the service directory.
    pub config_file: Option<PathBuf>,
}

impl ServiceManifest {
    /// Reads and validates `<service_dir>/manifest.yaml`.
    pub fn load(service_dir: &Path) -> ManifestResult<Self> {
        let path = service_dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(ManifestError::NotFound(path));
        }
        let text = fs::read_to_string(&path)?;
        let raw: RawManifest = serde_yaml::from_str(&text)?;

        let name = raw
            .name
            .ok_or(ManifestError::MissingField { field: "name" })?;
        let service = raw
            .service
            .ok_or(ManifestError::MissingField { field: "service" })?;

        Ok(Self {
            name,
            service,
            config_file: raw.config_file,
        })
    }
}
