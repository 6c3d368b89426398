//! Integration tests for the auth module
//!
//! Covers the credential store's refresh serialization and the
//! authorization client against a mock token endpoint.

#![cfg(feature = "test-utils")]

use std::sync::Arc;
use std::time::Duration;

use meridian_common::auth::{
    generate_state, validate_state, AuthorizationClient, AuthorizationClientTrait,
    AuthorizationError, CredentialStore, CredentialStoreError, OAuthConfig,
    CREDENTIAL_SESSION_KEY,
};
use meridian_common::testing::{credential, MockAuthorizationClient, MockSessionStore};
use meridian_domain::Credential;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug)]
enum RefreshFailure {
    Authorization(AuthorizationError),
    Store(CredentialStoreError),
}

impl From<CredentialStoreError> for RefreshFailure {
    fn from(err: CredentialStoreError) -> Self {
        Self::Store(err)
    }
}

async fn refresh(
    store: &CredentialStore,
    client: &MockAuthorizationClient,
    stale: &str,
) -> Result<Credential, RefreshFailure> {
    store
        .refresh_if_current(stale, |current| async move {
            client
                .exchange_refresh_token(current.refresh_token())
                .await
                .map_err(RefreshFailure::Authorization)
        })
        .await
}

/// Validates that concurrent refreshes of the same stale credential spend
/// the single-use refresh token exactly once.
///
/// # Test Steps
/// 1. Store credential `a1`
/// 2. Start several refreshes for `a1` at once against a slow token endpoint
/// 3. Verify one exchange happened and every caller got the same credential
#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_refresh_is_serialized() {
    let session = MockSessionStore::new();
    let store = Arc::new(CredentialStore::new(Arc::new(session.clone())));
    store.set(credential("a1")).await.unwrap();

    let client = MockAuthorizationClient::new();
    client.set_delay(Duration::from_millis(50));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let client = client.clone();
            tokio::spawn(async move { refresh(&store, &client, "a1").await })
        })
        .collect();

    let mut tokens = Vec::new();
    for handle in handles {
        tokens.push(handle.await.unwrap().unwrap().access_token().to_string());
    }

    assert_eq!(client.refresh_calls(), 1);
    assert_eq!(client.refresh_tokens_seen(), vec!["a1-refresh".to_string()]);
    assert!(tokens.iter().all(|token| token == "refreshed-1"));
    assert_eq!(store.get().await.unwrap().access_token(), "refreshed-1");
}

/// Validates that a failed refresh leaves the stored credential untouched
/// and that store failures surface as store errors.
#[tokio::test]
async fn test_failed_refresh_keeps_credential() {
    let session = MockSessionStore::new();
    let store = CredentialStore::new(Arc::new(session.clone()));
    store.set(credential("a1")).await.unwrap();

    let client = MockAuthorizationClient::new();
    client.push_refresh_result(Err(AuthorizationError::GrantInvalid));

    let err = refresh(&store, &client, "a1").await.unwrap_err();
    assert!(matches!(err, RefreshFailure::Authorization(AuthorizationError::GrantInvalid)));
    assert_eq!(store.get().await.unwrap().access_token(), "a1");

    session.set_should_fail(true);
    let err = refresh(&store, &client, "a1").await.unwrap_err();
    assert!(matches!(err, RefreshFailure::Store(CredentialStoreError::Session(_))));
    assert_eq!(store.get().await.unwrap().access_token(), "a1");
}

/// Validates that clearing removes the persisted record and rotates the
/// session identifier.
#[tokio::test]
async fn test_clear_requests_session_regeneration() {
    let session = MockSessionStore::new();
    let store = CredentialStore::new(Arc::new(session.clone()));
    store.set(credential("a1")).await.unwrap();
    assert!(session.get(CREDENTIAL_SESSION_KEY).is_some());

    store.clear().await.unwrap();
    assert!(session.get(CREDENTIAL_SESSION_KEY).is_none());
    assert_eq!(session.regenerations(), 1);
    assert!(!store.is_authenticated().await);
}

/// Validates a full redirect round trip: state, code exchange, storage and
/// a later refresh, against a mock token endpoint.
#[tokio::test]
async fn test_code_exchange_then_refresh_against_token_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "YWNjZXNzLTE=",
            "token_type": "bearer",
            "expires_in": 1200,
            "refresh_token": "cmVmcmVzaC0x",
            "user_id": "8c1f",
            "user_name": "Grace Hopper"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("refresh_token=cmVmcmVzaC0x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "YWNjZXNzLTI=",
            "token_type": "bearer",
            "expires_in": 1200,
            "refresh_token": "cmVmcmVzaC0y",
            "user_id": "8c1f",
            "user_name": "Grace Hopper"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthorizationClient::new(OAuthConfig::new(
        format!("{}/oauth/authorize", server.uri()),
        format!("{}/oauth/token", server.uri()),
        "client",
        "secret",
        "https://app.example.com/callback",
        "api",
    ));

    let state = generate_state();
    let url = client.authorization_url(&state).unwrap();
    assert!(url.contains(&format!("state={state}")));
    assert!(validate_state(&state, &state));
    assert!(!validate_state(&state, "forged"));

    let store = CredentialStore::new(Arc::new(MockSessionStore::new()));
    let credential = client.exchange_code("the-code", client.redirect_uri()).await.unwrap();
    store.set(credential).await.unwrap();

    let refreshed = store
        .refresh_if_current("YWNjZXNzLTE=", |current| async move {
            client
                .exchange_refresh_token(current.refresh_token())
                .await
                .map_err(RefreshFailure::Authorization)
        })
        .await
        .unwrap();
    assert_eq!(refreshed.access_token(), "YWNjZXNzLTI=");
    assert_eq!(store.get().await.unwrap().refresh_token(), "cmVmcmVzaC0y");
}
