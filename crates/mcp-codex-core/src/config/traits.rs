//! Configuration provider trait

use async_trait::async_trait;

use super::settings::ConfigFile;

/// A source of one configuration layer, e.g. `FileConfigProvider`
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Human-readable name used in log messages
    fn name(&self) -> String;

    /// Load this layer. A source with nothing to say returns `ConfigFile::default()`.
    async fn load(&self) -> ConfigResult<ConfigFile>;
}

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
