use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The credential store backends. We differentiate them via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(tag = "type")]
pub enum CredentialStoreConfig {
    #[serde(rename = "file")]
    File(FileStoreConfig),
    /// Nothing survives the process; handy for tests and throwaway sessions.
    #[serde(rename = "memory")]
    Memory,
}

impl Default for CredentialStoreConfig {
    fn default() -> Self {
        CredentialStoreConfig::File(FileStoreConfig::default())
    }
}

/// Where the file store keeps its JSON document.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct FileStoreConfig {
    /// A leading `~/` is expanded to `$HOME`.
    pub path: String,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        FileStoreConfig {
            path: "~/.pillbug/credentials.json".to_string(),
        }
    }
}

impl FileStoreConfig {
    /// The configured path with `~/` expanded. Without `$HOME` the path is used as written.
    pub fn resolved_path(&self) -> PathBuf {
        match (self.path.strip_prefix("~/"), std::env::var_os("HOME")) {
            (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
            _ => PathBuf::from(&self.path),
        }
    }
}
