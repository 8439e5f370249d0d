//! Shared authentication state.
//!
//! `AuthProvider` is the single owner of the current `AuthState`. It is
//! created once per application and handed to every consumer (usually
//! behind an `Arc`); readers subscribe to it instead of polling a global.

use std::fmt;
use std::sync::Arc;

use futures::stream::{self, Stream};
use tokio::sync::watch;
use tracing::debug;

use crate::client::ApiClient;
use crate::models::{Account, Instance};
use crate::session::display_domain;

/// Who is signed in, if anyone.
#[derive(Clone, Default)]
pub enum AuthState {
    /// Resolution has not finished yet.
    #[default]
    Unresolved,
    /// No usable credential.
    SignedOut,
    SignedIn(SignedIn),
    /// Resolution hit a fatal error. Rendered like `SignedOut`.
    Failed { message: String },
}

/// A fully validated session. Only constructible as a whole, so no reader
/// ever sees a half-filled value.
#[derive(Clone)]
pub struct SignedIn {
    client: Arc<dyn ApiClient>,
    instance: Instance,
    account: Account,
    domain: String,
}

impl SignedIn {
    /// Build a session; the display domain is derived from `instance.uri`.
    pub fn new(client: Arc<dyn ApiClient>, instance: Instance, account: Account) -> Self {
        let domain = display_domain(&instance.uri);
        SignedIn {
            client,
            instance,
            account,
            domain,
        }
    }

    pub fn client(&self) -> &Arc<dyn ApiClient> {
        &self.client
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// `username@domain`, as shown in the account menu.
    pub fn account_label(&self) -> String {
        format!("{}@{}", self.account.username, self.domain)
    }
}

impl PartialEq for SignedIn {
    fn eq(&self, other: &Self) -> bool {
        // Same handle, not merely an equivalent one.
        std::ptr::eq(
            Arc::as_ptr(&self.client) as *const (),
            Arc::as_ptr(&other.client) as *const (),
        ) && self.instance == other.instance
            && self.account == other.account
            && self.domain == other.domain
    }
}

impl fmt::Debug for SignedIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedIn")
            .field("client", &self.client)
            .field("instance", &self.instance.uri)
            .field("account", &self.account.username)
            .field("domain", &self.domain)
            .finish()
    }
}

impl PartialEq for AuthState {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AuthState::Unresolved, AuthState::Unresolved) => true,
            (AuthState::SignedOut, AuthState::SignedOut) => true,
            (AuthState::SignedIn(a), AuthState::SignedIn(b)) => a == b,
            (AuthState::Failed { message: a }, AuthState::Failed { message: b }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthState::Unresolved => f.write_str("Unresolved"),
            AuthState::SignedOut => f.write_str("SignedOut"),
            AuthState::SignedIn(session) => fmt::Debug::fmt(session, f),
            AuthState::Failed { message } => {
                f.debug_struct("Failed").field("message", message).finish()
            }
        }
    }
}

impl AuthState {
    /// Whether resolution has finished, one way or another.
    pub fn is_settled(&self) -> bool {
        !matches!(self, AuthState::Unresolved)
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthState::SignedIn(_))
    }

    pub fn signed_in(&self) -> Option<&SignedIn> {
        match self {
            AuthState::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    /// Whether the "log in" affordance should be offered.
    pub fn offers_sign_in(&self) -> bool {
        matches!(self, AuthState::SignedOut | AuthState::Failed { .. })
    }

    pub fn account_label(&self) -> Option<String> {
        self.signed_in().map(SignedIn::account_label)
    }
}

/// Holds the current `AuthState` and broadcasts every change.
pub struct AuthProvider {
    state: watch::Sender<AuthState>,
}

impl AuthProvider {
    pub fn new() -> Self {
        let (state, _) = watch::channel(AuthState::Unresolved);
        AuthProvider { state }
    }

    /// A snapshot of the current state.
    pub fn auth_state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Replace the state. Subscribers are marked changed before this returns.
    pub fn set_auth_state(&self, state: AuthState) {
        debug!("Auth state -> {:?}", state);
        self.state.send_replace(state);
    }

    /// Commit the outcome of a resolution attempt, but only over `Unresolved`.
    /// Returns false, leaving the state untouched, when something else (a
    /// sign-out) settled it first.
    pub(crate) fn settle(&self, state: AuthState) -> bool {
        let mut state = Some(state);
        let committed = self.state.send_if_modified(|current| {
            if current.is_settled() {
                return false;
            }
            if let Some(next) = state.take() {
                *current = next;
            }
            true
        });
        if committed {
            debug!("Auth state settled -> {:?}", *self.state.borrow());
        }
        committed
    }

    /// Sign the local session out: invalidate any live client and commit
    /// `SignedOut`. Returns false, without waking subscribers, when the
    /// state was already `SignedOut`.
    pub(crate) fn clear_session(&self) -> bool {
        self.state.send_if_modified(|state| match state {
            AuthState::SignedOut => false,
            AuthState::SignedIn(session) => {
                session.client().invalidate();
                *state = AuthState::SignedOut;
                true
            }
            AuthState::Unresolved | AuthState::Failed { .. } => {
                *state = AuthState::SignedOut;
                true
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Every state committed after this call, in order. Intermediate values
    /// may be skipped if the reader falls behind; the latest is never lost.
    pub fn changes(&self) -> impl Stream<Item = AuthState> + Send + 'static {
        stream::unfold(self.subscribe(), |mut rx| async move {
            rx.changed().await.ok()?;
            let state = rx.borrow_and_update().clone();
            Some((state, rx))
        })
    }
}

impl Default for AuthProvider {
    fn default() -> Self {
        Self::new()
    }
}
