//! Application startup.
//!
//! Builds the session core from configuration: the credential store, the
//! resolver that reads it, the shared `AuthProvider` and the initializer
//! that resolves it.

use std::sync::Arc;

use tracing::info;

use crate::client::StoredCredentialResolver;
use crate::config::ConfigV1;
use crate::notify::Notifier;
use crate::session::SessionInitializer;
use crate::state::AuthProvider;
use crate::store::create_store;

/// Everything one mount of the application needs.
pub struct Session {
    pub auth: Arc<AuthProvider>,
    pub resolver: Arc<StoredCredentialResolver>,
    pub initializer: SessionInitializer,
}

/// Wire up a fresh, unresolved session.
pub fn build_session(config: &ConfigV1, notifier: Arc<dyn Notifier>) -> Session {
    let store = create_store(&config.credentials);
    let resolver = Arc::new(StoredCredentialResolver::new(store, config.client.clone()));
    let auth = Arc::new(AuthProvider::new());
    let initializer = SessionInitializer::new(auth.clone(), resolver.clone(), notifier);

    info!("Session core initialised");
    Session {
        auth,
        resolver,
        initializer,
    }
}
