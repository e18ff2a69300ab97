use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

/// Runtime configuration, loaded from `HUDUMA_`-prefixed environment
/// variables with sensible defaults
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub backend: BackendConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted client state, one JSON document
    /// per storage key
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend API the payment dispatch posts to
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Cosmetic processing pause before the confirmation state, in
    /// milliseconds
    #[serde(default = "default_confirm_delay_ms")]
    pub payment_confirm_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_enable_json_logging")]
    pub enable_json_logging: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment");

        let storage = StorageConfig::from_env()?;
        let backend = BackendConfig::from_env()?;
        let observability = ObservabilityConfig::from_env()?;

        let config = Config {
            storage,
            backend,
            observability,
        };

        config.validate()?;

        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.data_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Storage data dir cannot be empty".to_string(),
            });
        }

        if self.backend.api_base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Backend API base URL cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl BackendConfig {
    pub fn payment_confirm_delay(&self) -> Duration {
        Duration::from_millis(self.payment_confirm_delay_ms)
    }
}

fn from_env<T: serde::de::DeserializeOwned>(section: &str) -> Result<T, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix("HUDUMA"))
        .build()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to load {} config: {}", section, e),
        })?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to deserialize {} config: {}", section, e),
        })
}

impl StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        from_env("storage")
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        from_env("backend")
    }
}

impl ObservabilityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        from_env("observability")
    }
}

// Default value functions
pub(crate) fn default_data_dir() -> String {
    ".huduma".to_string()
}

pub(crate) fn default_api_base_url() -> String {
    "http://localhost:4000".to_string()
}

pub(crate) fn default_confirm_delay_ms() -> u64 {
    1500
}

pub(crate) fn default_service_name() -> String {
    "huduma-core".to_string()
}

pub(crate) fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_enable_json_logging() -> bool {
    std::env::var("HUDUMA_ENABLE_JSON_LOGGING")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}
