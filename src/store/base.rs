use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use super::{file_store::FileCredentialStore, memory_store::MemoryCredentialStore};
use crate::config::CredentialStoreConfig;
use crate::models::StoredCredential;

/// Failures while reading or writing the persisted credential.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store i/o error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("credential file {} is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The CredentialStore trait abstracts credential persistence (load, save, clear).
///
/// At most one credential is stored at a time: the account the client signs in as.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    fn get_name(&self) -> &str;
    /// Returns `Ok(None)` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<StoredCredential>, StoreError>;
    async fn save(&self, credential: &StoredCredential) -> Result<(), StoreError>;
    /// Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), StoreError>;
}

/// Creates a concrete store implementation based on the CredentialStoreConfig.
pub fn create_store(config: &CredentialStoreConfig) -> Arc<dyn CredentialStore> {
    match config {
        CredentialStoreConfig::File(file_config) => {
            let store = FileCredentialStore::new(file_config.resolved_path());
            info!(
                "Using file credential store at {}",
                store.path().display()
            );
            Arc::new(store)
        }
        CredentialStoreConfig::Memory => {
            info!("Using in-memory credential store; credentials are lost on exit.");
            Arc::new(MemoryCredentialStore::new())
        }
    }
}
