use tracing::{info, warn};

use crate::client::ClientResolver;
use crate::state::AuthProvider;
use crate::store::StoreError;

/// Forget the stored credential, invalidate the live client and commit
/// `SignedOut`.
///
/// Signing out while already signed out leaves the state untouched and wakes
/// no subscribers. The local session is always cleared; a failure to clear
/// the stored credential is returned afterwards.
pub async fn sign_out(auth: &AuthProvider, resolver: &dyn ClientResolver) -> Result<(), StoreError> {
    let forgotten = resolver.forget().await;
    if let Err(e) = &forgotten {
        warn!("Could not clear stored credential: {}", e);
    }

    if auth.clear_session() {
        info!("Signed out");
    }
    forgotten
}
