//! Shared test helpers for `meridian-core` integration tests.
//!
//! Provides an in-memory resource server and session fixtures so the
//! protocol tests can focus on behaviour instead of wiring.

#![allow(dead_code)]

pub mod fetchers;

use std::sync::Arc;

use meridian_common::auth::{CredentialStore, InMemorySessionStore};
use meridian_common::testing::{credential, MockAuthorizationClient};
use meridian_core::SessionContext;

/// A logged-in session holding credential `access_token`.
pub async fn logged_in_session(
    access_token: &str,
) -> (SessionContext, Arc<CredentialStore>, MockAuthorizationClient) {
    let store = Arc::new(CredentialStore::new(Arc::new(InMemorySessionStore::new())));
    store.set(credential(access_token)).await.unwrap();
    let authorization = MockAuthorizationClient::new();
    let session = SessionContext::new(Arc::clone(&store), Arc::new(authorization.clone()));
    (session, store, authorization)
}
