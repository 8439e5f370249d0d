use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CredentialStore, StoreError};
use crate::models::StoredCredential;

/// A store that keeps the credential in process memory only.
#[derive(Default)]
pub struct MemoryCredentialStore {
    credential: RwLock<Option<StoredCredential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `credential`.
    pub fn with_credential(credential: StoredCredential) -> Self {
        MemoryCredentialStore {
            credential: RwLock::new(Some(credential)),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    fn get_name(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> Result<Option<StoredCredential>, StoreError> {
        Ok(self.credential.read().await.clone())
    }

    async fn save(&self, credential: &StoredCredential) -> Result<(), StoreError> {
        *self.credential.write().await = Some(credential.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.credential.write().await.take();
        Ok(())
    }
}
