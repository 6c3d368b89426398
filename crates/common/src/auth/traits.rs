//! Traits for authorization and session storage
//!
//! These traits enable dependency injection and testing by abstracting
//! external dependencies (the OAuth2 token endpoint, per-session storage).

use async_trait::async_trait;
use meridian_domain::Credential;

use super::types::AuthorizationError;

/// Trait for token endpoint exchanges
///
/// Implementations never retry internally; recoverability is decided by the
/// caller.
#[async_trait]
pub trait AuthorizationClientTrait: Send + Sync {
    /// Exchange an authorization code for a credential
    ///
    /// # Arguments
    /// * `code` - Authorization code from the redirect callback
    /// * `redirect_uri` - The redirect URI used in the authorization request
    ///
    /// # Errors
    /// Returns [`AuthorizationError::GrantInvalid`] if the code is expired or
    /// already used, and [`AuthorizationError::Failed`] for any other failure
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<Credential, AuthorizationError>;

    /// Exchange a refresh token for a new credential
    ///
    /// The remote invalidates `refresh_token` on success; the returned
    /// credential carries its replacement.
    ///
    /// # Errors
    /// Returns [`AuthorizationError::GrantInvalid`] if the refresh token is
    /// expired, revoked or already consumed
    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Credential, AuthorizationError>;
}

/// Trait for the per-session key-value store
///
/// The store is scoped to a single user session; keys never collide across
/// sessions.
#[async_trait]
pub trait SessionStoreTrait: Send + Sync {
    /// Load a value, `None` if absent
    ///
    /// # Errors
    /// Returns error if the backing store is unavailable
    async fn load(&self, key: &str) -> Result<Option<String>, String>;

    /// Store a value, replacing any previous one
    ///
    /// # Errors
    /// Returns error if storage fails
    async fn save(&self, key: &str, value: String) -> Result<(), String>;

    /// Remove a value (absent keys are not an error)
    ///
    /// # Errors
    /// Returns error if deletion fails
    async fn remove(&self, key: &str) -> Result<(), String>;

    /// Issue a new session identifier (session-fixation defense)
    ///
    /// # Errors
    /// Returns error if the identifier cannot be rotated
    async fn regenerate_id(&self) -> Result<(), String>;
}
