//! Service loading: manifest + layered configuration + registry build.
//!
//! `load_service` is the single entry point that turns a service directory
//! into a ready-to-run instance:
//!
//! 1. read and validate `manifest.yaml`;
//! 2. read the system-wide config layer (absent file ⇒ empty mapping);
//! 3. resolve the service's own config file (explicit option wins over the
//!    manifest's `config_file`, both relative to the service directory) and
//!    deep-merge it over the system layer — an absent file is not an error;
//! 4. build the instance through the registry.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::{ConfigError, ConfigResult, deep_merge};
use crate::error::LoadResult;
use crate::manifest::ServiceManifest;
use crate::registry::ServiceRegistry;
use crucible_core::BoxedService;

/// Options controlling where configuration layers come from.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Path to the system-wide configuration file.
    pub system_config: PathBuf,
    /// Explicit service config path, overriding the manifest's `config_file`.
    pub override_config: Option<PathBuf>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            system_config: PathBuf::from("config/system.yaml"),
            override_config: None,
        }
    }
}

impl LoadOptions {
    /// Sets the system configuration path.
    pub fn system_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.system_config = path.into();
        self
    }

    /// Sets an explicit service config path.
    pub fn override_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_config = Some(path.into());
        self
    }
}

/// Loads the service described by `service_dir` and builds it via `registry`.
pub async fn load_service(
    registry: &ServiceRegistry,
    service_dir: impl AsRef<Path>,
    options: &LoadOptions,
) -> LoadResult<BoxedService> {
    let dir = service_dir.as_ref();
    let manifest = ServiceManifest::load(dir)?;

    let mut config = read_yaml_layer(&options.system_config)?;

    let override_path = options
        .override_config
        .clone()
        .or_else(|| manifest.config_file.clone())
        .map(|p| dir.join(p));
    if let Some(path) = override_path {
        if path.exists() {
            let overlay = read_yaml_layer(&path)?;
            config = deep_merge(&config, &overlay);
        } else {
            debug!(
                path = %path.display(),
                "service config file not found, using system layer only"
            );
        }
    }

    let service = registry
        .build(&manifest.service, &manifest.name, &config)
        .await?;
    info!(
        name = %manifest.name,
        service_type = %manifest.service,
        "loaded service"
    );
    Ok(service)
}

/// Reads one YAML configuration layer as a JSON value.
///
/// An absent file or an empty document yields an empty mapping, not an
/// error — missing layers are a normal configuration state.
pub fn read_yaml_layer(path: &Path) -> ConfigResult<Value> {
    if !path.exists() {
        return Ok(Value::Object(Map::new()));
    }
    let text = fs::read_to_string(path)?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&text)?;
    let value = serde_json::to_value(yaml).map_err(|e| ConfigError::Extract(e.to_string()))?;
    Ok(match value {
        Value::Null => Value::Object(Map::new()),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    use crate::error::{LoadError, ManifestError};
    use crucible_core::{Job, JobResponse, JobService, ServiceFactory, ServiceResult};

    /// Factory that records the config it was built with.
    struct ProbeFactory {
        seen: Arc<Mutex<Option<(String, Value)>>>,
    }

    struct ProbeService;

    #[async_trait]
    impl JobService for ProbeService {
        fn name(&self) -> &str {
            "probe"
        }

        async fn handle(&self, job: Job) -> JobResponse {
            JobResponse::error(job.topic, "not implemented")
        }
    }

    #[async_trait]
    impl ServiceFactory for ProbeFactory {
        fn service_type(&self) -> &'static str {
            "probe"
        }

        async fn build(&self, name: &str, config: &Value) -> ServiceResult<BoxedService> {
            *self.seen.lock().await = Some((name.to_string(), config.clone()));
            Ok(Arc::new(ProbeService))
        }
    }

    async fn probe_registry() -> (ServiceRegistry, Arc<Mutex<Option<(String, Value)>>>) {
        let seen = Arc::new(Mutex::new(None));
        let registry = ServiceRegistry::new();
        registry
            .register(Arc::new(ProbeFactory {
                seen: Arc::clone(&seen),
            }))
            .await;
        (registry, seen)
    }

    #[tokio::test]
    async fn merges_system_and_service_layers() {
        let dir = tempfile::tempdir().unwrap();
        let system = dir.path().join("system.yaml");
        fs::write(&system, "timeout: 30\nnested:\n  a: 1\n  b: 2\n").unwrap();
        fs::write(
            dir.path().join("manifest.yaml"),
            "name: probe_one\nservice: probe\nconfig_file: config.yaml\n",
        )
        .unwrap();
        fs::write(dir.path().join("config.yaml"), "timeout: 5\nnested:\n  b: 20\n").unwrap();

        let (registry, seen) = probe_registry().await;
        let options = LoadOptions::default().system_config(&system);
        load_service(&registry, dir.path(), &options).await.unwrap();

        let (name, config) = seen.lock().await.clone().unwrap();
        assert_eq!(name, "probe_one");
        assert_eq!(
            config,
            json!({"timeout": 5, "nested": {"a": 1, "b": 20}})
        );
    }

    #[tokio::test]
    async fn absent_config_files_fall_back_to_empty_layers() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("manifest.yaml"),
            "name: probe_one\nservice: probe\nconfig_file: nope.yaml\n",
        )
        .unwrap();

        let (registry, seen) = probe_registry().await;
        let options = LoadOptions::default().system_config(dir.path().join("no-system.yaml"));
        load_service(&registry, dir.path(), &options).await.unwrap();

        let (_, config) = seen.lock().await.clone().unwrap();
        assert_eq!(config, json!({}));
    }

    #[tokio::test]
    async fn explicit_override_beats_manifest_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("manifest.yaml"),
            "name: probe_one\nservice: probe\nconfig_file: config.yaml\n",
        )
        .unwrap();
        fs::write(dir.path().join("config.yaml"), "which: manifest\n").unwrap();
        fs::write(dir.path().join("special.yaml"), "which: explicit\n").unwrap();

        let (registry, seen) = probe_registry().await;
        let options = LoadOptions::default()
            .system_config(dir.path().join("no-system.yaml"))
            .override_config("special.yaml");
        load_service(&registry, dir.path(), &options).await.unwrap();

        let (_, config) = seen.lock().await.clone().unwrap();
        assert_eq!(config, json!({"which": "explicit"}));
    }

    #[tokio::test]
    async fn missing_manifest_surfaces_as_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let (registry, _) = probe_registry().await;

        let err = load_service(&registry, dir.path(), &LoadOptions::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(
            err,
            LoadError::Manifest(ManifestError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unknown_service_type_surfaces_as_load_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("manifest.yaml"),
            "name: x\nservice: does_not_exist\n",
        )
        .unwrap();

        let (registry, _) = probe_registry().await;
        let err = load_service(&registry, dir.path(), &LoadOptions::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LoadError::Registry(_)));
    }

    #[test]
    fn empty_yaml_layer_reads_as_empty_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.yaml");
        fs::write(&path, "").unwrap();
        assert_eq!(read_yaml_layer(&path).unwrap(), json!({}));
    }
}
