//! Host configuration: schema, figment loader and the layered deep merge
//! used for per-service configuration.

pub mod error;
pub mod loader;
pub mod merge;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use merge::{deep_merge, merge_layers};
pub use schema::{HostConfig, LogFormat, LogLevel, LoggingConfig};
