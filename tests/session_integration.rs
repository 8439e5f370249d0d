mod common;

use common::{
    build_test_session, load_test_config, mock_instance, mock_verify_credentials, MEMORY_CONFIG,
};
use futures::StreamExt;
use mockito::Server;
use pillbug::client::ClientResolver;
use pillbug::models::StoredCredential;
use pillbug::session::Resolution;
use pillbug::state::AuthState;
use pillbug::store::{CredentialStore, FileCredentialStore};

const INSTANCE_BODY: &str = r#"{"uri": "https://fosstodon.org", "title": "Fosstodon", "version": "4.2.0"}"#;
const ACCOUNT_BODY: &str = r#"{"id": "109", "username": "alice", "acct": "alice", "display_name": "Alice"}"#;

#[tokio::test]
async fn resolves_stored_credential_to_signed_in() {
    let mut server = Server::new_async().await;
    let instance = mock_instance(&mut server, 200, INSTANCE_BODY).await;
    let account = mock_verify_credentials(&mut server, "tok-alice", 200, ACCOUNT_BODY).await;

    let config = load_test_config(MEMORY_CONFIG);
    let (session, notifier) = build_test_session(&config);
    session
        .resolver
        .remember(&StoredCredential::new(server.url(), "tok-alice"))
        .await
        .unwrap();

    let outcome = session.initializer.resolve_session().await;

    instance.assert_async().await;
    account.assert_async().await;
    assert_eq!(outcome, Resolution::SignedIn);
    assert!(!session.initializer.is_busy());
    assert!(notifier.messages().is_empty());

    let state = session.auth.auth_state();
    let signed_in = state.signed_in().expect("signed in");
    assert_eq!(signed_in.domain(), "fosstodon.org");
    assert_eq!(signed_in.account().username, "alice");
    assert_eq!(signed_in.account().display_name, "Alice");
    assert_eq!(state.account_label().as_deref(), Some("alice@fosstodon.org"));
}

#[tokio::test]
async fn empty_store_resolves_to_signed_out() {
    let config = load_test_config(MEMORY_CONFIG);
    let (session, notifier) = build_test_session(&config);

    let outcome = session.initializer.resolve_session().await;

    assert_eq!(outcome, Resolution::SignedOut);
    assert_eq!(session.auth.auth_state(), AuthState::SignedOut);
    assert!(session.auth.auth_state().offers_sign_in());
    assert!(!session.initializer.is_busy());
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn rejected_token_is_reported_once() {
    let mut server = Server::new_async().await;
    let _instance = mock_instance(&mut server, 200, INSTANCE_BODY).await;
    let account = mock_verify_credentials(
        &mut server,
        "revoked",
        401,
        r#"{"error": "The access token is invalid"}"#,
    )
    .await;

    let config = load_test_config(MEMORY_CONFIG);
    let (session, notifier) = build_test_session(&config);
    session
        .resolver
        .remember(&StoredCredential::new(server.url(), "revoked"))
        .await
        .unwrap();

    let outcome = session.initializer.resolve_session().await;

    account.assert_async().await;
    assert_eq!(outcome, Resolution::Failed);
    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Unauthorized"));

    let state = session.auth.auth_state();
    assert!(!state.is_signed_in());
    assert_ne!(state, AuthState::SignedOut);
    assert!(!session.initializer.is_busy());
}

#[tokio::test]
async fn instance_outage_stops_before_account_lookup() {
    let mut server = Server::new_async().await;
    let _instance = mock_instance(&mut server, 502, "Bad Gateway").await;
    let account = server
        .mock("GET", "/api/v1/accounts/verify_credentials")
        .expect(0)
        .create_async()
        .await;

    let config = load_test_config(MEMORY_CONFIG);
    let (session, notifier) = build_test_session(&config);
    session
        .resolver
        .remember(&StoredCredential::new(server.url(), "tok"))
        .await
        .unwrap();

    session.initializer.resolve_session().await;

    account.assert_async().await;
    assert_eq!(
        notifier.messages(),
        vec!["Error loading page: Failed to get instance info: 502 Bad Gateway".to_string()]
    );
}

#[tokio::test]
async fn sign_out_clears_session_and_credential() {
    let mut server = Server::new_async().await;
    let _instance = mock_instance(&mut server, 200, INSTANCE_BODY).await;
    let _account = mock_verify_credentials(&mut server, "tok-alice", 200, ACCOUNT_BODY).await;

    let config = load_test_config(MEMORY_CONFIG);
    let (session, notifier) = build_test_session(&config);
    session
        .resolver
        .remember(&StoredCredential::new(server.url(), "tok-alice"))
        .await
        .unwrap();
    session.initializer.resolve_session().await;

    let state = session.auth.auth_state();
    let client = state.signed_in().expect("signed in").client().clone();
    let mut changes = Box::pin(session.auth.changes());

    session.initializer.sign_out().await.unwrap();

    assert_eq!(changes.next().await, Some(AuthState::SignedOut));
    assert_eq!(session.auth.auth_state(), AuthState::SignedOut);
    assert!(client.is_invalidated());
    assert!(session.resolver.resolve().await.is_none());

    // A second sign-out changes nothing and notifies nobody.
    let rx = session.auth.subscribe();
    session.initializer.sign_out().await.unwrap();
    assert!(!rx.has_changed().unwrap());
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn file_store_survives_a_remount() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    let yaml = format!(
        r#"
version: "1.0.0"
credentials:
  type: file
  path: "{}"
"#,
        path.display()
    );
    let config = load_test_config(&yaml);

    let mut server = Server::new_async().await;
    let _instance = mock_instance(&mut server, 200, r#"{"uri": "not a url"}"#).await;
    let _account = mock_verify_credentials(&mut server, "tok-bob", 200, r#"{"username": "bob"}"#).await;

    {
        let (first, _) = build_test_session(&config);
        first
            .resolver
            .remember(&StoredCredential::new(server.url(), "tok-bob"))
            .await
            .unwrap();
    }

    let stored = FileCredentialStore::new(&path).load().await.unwrap();
    assert_eq!(stored.map(|c| c.access_token), Some("tok-bob".to_string()));

    let (second, _) = build_test_session(&config);
    assert_eq!(second.initializer.resolve_session().await, Resolution::SignedIn);
    assert_eq!(
        second.auth.auth_state().account_label().as_deref(),
        Some("bob@not a url")
    );

    second.initializer.sign_out().await.unwrap();
    assert!(!path.exists());
}

#[tokio::test]
async fn unreachable_instance_is_reported_as_failure() {
    // Grab a free port, then close it so connections are refused.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = load_test_config(MEMORY_CONFIG);
    let (session, notifier) = build_test_session(&config);
    session
        .resolver
        .remember(&StoredCredential::new(format!("http://127.0.0.1:{}", port), "tok"))
        .await
        .unwrap();

    let outcome = session.initializer.resolve_session().await;

    assert_eq!(outcome, Resolution::Failed);
    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Error loading page: Failed to get instance info: request failed"));
    assert!(matches!(session.auth.auth_state(), AuthState::Failed { .. }));
    assert!(!session.initializer.is_busy());
}
