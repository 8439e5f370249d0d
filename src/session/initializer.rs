use std::sync::Arc;

use tokio::sync::{watch, OnceCell};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use super::error::ResolutionError;
use crate::client::ClientResolver;
use crate::notify::Notifier;
use crate::state::{AuthProvider, AuthState, SignedIn};
use crate::store::StoreError;

/// How a resolution attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    SignedIn,
    SignedOut,
    /// A remote call failed; the user has been notified.
    Failed,
    /// Nothing was committed: the initializer was cancelled, or a sign-out
    /// settled the state while the attempt was still running.
    Cancelled,
}

/// Resolves the initial `AuthState` once per mount.
///
/// The attempt is cached: however many times `resolve_session` is called,
/// and from however many tasks, resolution runs once and every caller gets
/// the same outcome. A front end being torn down calls `cancel()` so an
/// attempt still in flight never commits a stale result.
pub struct SessionInitializer {
    auth: Arc<AuthProvider>,
    resolver: Arc<dyn ClientResolver>,
    notifier: Arc<dyn Notifier>,
    busy: watch::Sender<bool>,
    attempt: OnceCell<Resolution>,
    cancel: CancellationToken,
}

impl SessionInitializer {
    pub fn new(
        auth: Arc<AuthProvider>,
        resolver: Arc<dyn ClientResolver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        // Busy from mount until the first attempt completes.
        let (busy, _) = watch::channel(true);
        SessionInitializer {
            auth,
            resolver,
            notifier,
            busy,
            attempt: OnceCell::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn auth(&self) -> &Arc<AuthProvider> {
        &self.auth
    }

    /// True while resolution is pending; gates normal rendering.
    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    /// Outcome of the attempt, if it has finished.
    pub fn resolution(&self) -> Option<Resolution> {
        self.attempt.get().copied()
    }

    /// Stop an in-flight attempt from committing anything.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolve the session, or return the outcome of the attempt already made.
    pub async fn resolve_session(&self) -> Resolution {
        *self.attempt.get_or_init(|| self.run_attempt()).await
    }

    /// Sign out through this initializer's resolver.
    pub async fn sign_out(&self) -> Result<(), StoreError> {
        super::sign_out(&self.auth, self.resolver.as_ref()).await
    }

    async fn run_attempt(&self) -> Resolution {
        let span = info_span!("resolve_session", attempt_id = %Uuid::new_v4());
        async {
            let _busy = BusyGuard::engage(&self.busy);

            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                outcome = self.resolve() => Some(outcome),
            };

            // Cancellation may land between the last await and here.
            let outcome = match outcome {
                Some(outcome) if !self.cancel.is_cancelled() => outcome,
                _ => {
                    info!("Session resolution cancelled; nothing committed");
                    return Resolution::Cancelled;
                }
            };

            let (state, resolution) = match outcome {
                Ok(Some(session)) => (AuthState::SignedIn(session), Resolution::SignedIn),
                Ok(None) => (AuthState::SignedOut, Resolution::SignedOut),
                Err(e) => (
                    AuthState::Failed {
                        message: e.to_string(),
                    },
                    Resolution::Failed,
                ),
            };

            let client = state.signed_in().map(|session| session.client().clone());
            let failure = match &state {
                AuthState::Failed { message } => Some(message.clone()),
                _ => None,
            };
            let instance_uri = state.signed_in().map(|session| session.instance().uri.clone());

            // A sign-out during the attempt wins over whatever it found.
            if !self.auth.settle(state) {
                if let Some(client) = client {
                    client.invalidate();
                }
                info!("Session settled while resolving; result discarded");
                return Resolution::Cancelled;
            }

            if let Some(uri) = instance_uri {
                info!("signed in to instance {}", uri);
            }
            if let Some(message) = failure {
                error!("Session resolution failed: {}", message);
                self.notifier
                    .notify_error(&format!("Error loading page: {}", message));
            }
            if resolution == Resolution::SignedOut {
                info!("No stored credential; signed out");
            }
            resolution
        }
        .instrument(span)
        .await
    }

    /// `Ok(None)` when there is no client to validate.
    async fn resolve(&self) -> Result<Option<SignedIn>, ResolutionError> {
        let Some(client) = self.resolver.resolve().await else {
            return Ok(None);
        };
        debug!("Validating stored session against {}", client.base_url());

        let instance = client
            .get_instance()
            .await
            .map_err(|e| ResolutionError::Instance(e.to_string()))?
            .into_result()
            .map_err(ResolutionError::Instance)?;

        let account = client
            .verify_account_credentials()
            .await
            .map_err(|e| ResolutionError::Account(e.to_string()))?
            .into_result()
            .map_err(ResolutionError::Account)?;

        Ok(Some(SignedIn::new(client, instance, account)))
    }
}

/// Holds `busy` high for its lifetime; clearing happens on every exit path.
struct BusyGuard<'a> {
    busy: &'a watch::Sender<bool>,
}

impl<'a> BusyGuard<'a> {
    fn engage(busy: &'a watch::Sender<bool>) -> Self {
        busy.send_replace(true);
        BusyGuard { busy }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.send_replace(false);
    }
}
