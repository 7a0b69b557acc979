//! Host configuration loader using figment.
//!
//! Loads [`HostConfig`] from layered sources, later sources overriding
//! earlier ones:
//!
//! 1. Built-in defaults
//! 2. `crucible.yaml` / `crucible.yml` from the search paths
//! 3. Environment variables (`CRUCIBLE_*`, `__` as nesting separator)
//!
//! Environment variable mapping: `CRUCIBLE_LOGGING__LEVEL=debug` →
//! `logging.level = "debug"`.
//!
//! Note this is the *host's own* configuration. Per-service configuration
//! is layered separately by the manifest loader via
//! [`deep_merge`](crate::config::deep_merge).

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use tracing::debug;

use super::error::{ConfigError, ConfigResult};
use super::schema::HostConfig;

const CONFIG_FILE_NAMES: [&str; 2] = ["crucible.yaml", "crucible.yml"];

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    search_paths: Vec<PathBuf>,
    config_file: Option<PathBuf>,
    load_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader with default search behavior.
    pub fn new() -> Self {
        Self {
            search_paths: Vec::new(),
            config_file: None,
            load_env: true,
        }
    }

    /// Adds a search path for configuration files.
    pub fn search_path(mut self, path: impl AsRef<Path>) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds the current directory to the search paths.
    pub fn with_current_dir(self) -> Self {
        if let Ok(cwd) = std::env::current_dir() {
            self.search_path(cwd)
        } else {
            self
        }
    }

    /// Adds the user config directory (`<config>/crucible`) to the search paths.
    pub fn with_user_config_dir(self) -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            self.search_path(config_dir.join("crucible"))
        } else {
            self
        }
    }

    /// Sets a specific configuration file, bypassing the search.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Disables environment variable loading.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Loads and returns the host configuration.
    pub fn load(self) -> ConfigResult<HostConfig> {
        let mut figment = Figment::from(Serialized::defaults(HostConfig::default()));

        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            debug!(path = %path.display(), "loading host configuration file");
            figment = figment.merge(Yaml::file(path));
        } else {
            for search_path in self.resolve_search_paths() {
                for name in CONFIG_FILE_NAMES {
                    let candidate = search_path.join(name);
                    if candidate.exists() {
                        debug!(path = %candidate.display(), "loading host configuration file");
                        figment = figment.merge(Yaml::file(candidate));
                    }
                }
            }
        }

        if self.load_env {
            figment = figment.merge(Env::prefixed("CRUCIBLE_").split("__"));
        }

        figment
            .extract()
            .map_err(|e| ConfigError::Extract(e.to_string()))
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("crucible"));
        }
        paths
    }
}
