//! OAuth2 credential lifecycle
//!
//! This module acquires, stores and refreshes the bearer credential of one
//! user session.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │   CredentialStore    │  Per-session credential + refresh gate
//! └──────────┬───────────┘
//!            │
//!            └──► SessionStoreTrait     (opaque per-session key-value store)
//!
//! ┌──────────────────────┐
//! │ AuthorizationClient  │  Token endpoint exchanges (code, refresh token)
//! └──────────┬───────────┘
//!            │
//!            └──► classify::oauth       (RFC 6749 error envelopes)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use meridian_common::auth::{
//!     generate_state, AuthorizationClient, CredentialStore, InMemorySessionStore, OAuthConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OAuthConfig::new(
//!     "https://auth.example.com/authorize",
//!     "https://auth.example.com/token",
//!     "client_id",
//!     "client_secret",
//!     "https://app.example.com/callback",
//!     "api",
//! );
//! let client = AuthorizationClient::new(config);
//! let store = CredentialStore::new(Arc::new(InMemorySessionStore::new()));
//!
//! // Redirect the user, then exchange the code from the callback
//! let state = generate_state();
//! let url = client.authorization_url(&state)?;
//! println!("Open {url}");
//!
//! let credential = client.exchange_code("code", client.redirect_uri()).await?;
//! store.set(credential).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: `OAuthConfig`, `TokenResponse`, `AuthorizationError`
//! - **[`state`]**: CSRF state generation and constant-time validation
//! - **[`client`]**: token endpoint client
//! - **[`credential_store`]**: session-scoped credential holder
//! - **[`session`]**: in-memory session store
//! - **[`traits`]**: seams for injection and testing

pub mod client;
pub mod credential_store;
pub mod session;
pub mod state;
pub mod traits;
pub mod types;

// Re-export commonly used types and functions
pub use client::AuthorizationClient;
pub use credential_store::{CredentialStore, CredentialStoreError, CREDENTIAL_SESSION_KEY};
pub use session::InMemorySessionStore;
pub use state::{generate_state, validate_state};
pub use traits::{AuthorizationClientTrait, SessionStoreTrait};
pub use types::{AuthorizationError, OAuthConfig, TokenResponse};
