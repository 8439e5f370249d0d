use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LoggingConfig;
use super::store::CredentialStoreConfig;

/// Environment variables with this prefix override file values,
/// e.g. `PILLBUG_LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "PILLBUG_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error loading configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("Invalid logging.level '{0}'. Valid values: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
    #[error("Could not install log subscriber: {0}")]
    Logging(String),
}

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub credentials: CredentialStoreConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// Settings for the HTTP client used against the instance.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ClientConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// No timeout unless set; a hung instance keeps resolution pending.
    #[serde(default)]
    pub timeout_in_ms: Option<u64>,
}

fn default_user_agent() -> String {
    format!("pillbug/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            user_agent: default_user_agent(),
            timeout_in_ms: None,
        }
    }
}

impl ConfigV1 {
    /// Extract a config from any figment, unwrapping the version tag.
    pub fn from_figment(figment: Figment) -> Result<ConfigV1, ConfigError> {
        let config = figment.extract::<Config>().map_err(Box::new)?;
        // handle configuration migration between versions here when necessary
        match config {
            Config::ConfigV1(c) => Ok(c),
        }
    }
}

/// Load config from a YAML file, with `PILLBUG_*` environment overrides on top.
pub fn load_config(path: &Path) -> Result<ConfigV1, ConfigError> {
    let figment = Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));
    ConfigV1::from_figment(figment)
}

/// Render the JSON schema for the configuration.
pub fn config_schema() -> String {
    let schema = schema_for!(Config);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
