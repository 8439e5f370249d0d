use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{ApiClient, HttpApiClient};
use crate::config::ClientConfig;
use crate::models::StoredCredential;
use crate::store::{CredentialStore, StoreError};

/// Turns whatever credential is stored into an authenticated client handle.
#[async_trait]
pub trait ClientResolver: Send + Sync {
    /// `None` when no usable credential is stored. Store failures are
    /// reported as `None` too; they never reach the caller.
    async fn resolve(&self) -> Option<Arc<dyn ApiClient>>;
    /// Drop the stored credential so later `resolve` calls return `None`.
    async fn forget(&self) -> Result<(), StoreError>;
}

/// Resolves clients from the credential held in a `CredentialStore`.
pub struct StoredCredentialResolver {
    store: Arc<dyn CredentialStore>,
    client_config: ClientConfig,
}

impl StoredCredentialResolver {
    pub fn new(store: Arc<dyn CredentialStore>, client_config: ClientConfig) -> Self {
        StoredCredentialResolver {
            store,
            client_config,
        }
    }

    /// Persist a credential; the next resolution signs in with it.
    pub async fn remember(&self, credential: &StoredCredential) -> Result<(), StoreError> {
        self.store.save(credential).await?;
        info!(
            "Stored credential for {} in {} store",
            credential.instance_url,
            self.store.get_name()
        );
        Ok(())
    }
}

#[async_trait]
impl ClientResolver for StoredCredentialResolver {
    async fn resolve(&self) -> Option<Arc<dyn ApiClient>> {
        let credential = match self.store.load().await {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                debug!("No stored credential in {} store", self.store.get_name());
                return None;
            }
            Err(e) => {
                warn!("Could not read stored credential, treating as signed out: {}", e);
                return None;
            }
        };

        match HttpApiClient::new(&credential, &self.client_config) {
            Ok(client) => {
                debug!("Resolved client for {}", credential.instance_url);
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!(
                    "Stored credential for '{}' is unusable, treating as signed out: {}",
                    credential.instance_url, e
                );
                None
            }
        }
    }

    async fn forget(&self) -> Result<(), StoreError> {
        self.store.clear().await?;
        debug!("Cleared stored credential from {} store", self.store.get_name());
        Ok(())
    }
}
