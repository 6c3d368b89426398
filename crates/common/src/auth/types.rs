//! OAuth2 types and structures
//!
//! Configuration of the authorization server, the token endpoint's success
//! body, and the errors surfaced by the authorization client.

use std::fmt;

use meridian_domain::constants::DEFAULT_TOKEN_TYPE;
use meridian_domain::{Credential, CredentialError, OAuthSettings};
use serde::Deserialize;
use thiserror::Error;

use crate::classify::OAuth2ErrorCode;

/// OAuth2 authorization server configuration
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    /// Browser authorization endpoint
    pub authorize_url: String,
    /// Token endpoint (code and refresh token exchange)
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
}

impl OAuthConfig {
    /// Create a new OAuth configuration
    #[must_use]
    pub fn new(
        authorize_url: impl Into<String>,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            authorize_url: authorize_url.into(),
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scope: scope.into(),
        }
    }
}

impl From<&OAuthSettings> for OAuthConfig {
    fn from(settings: &OAuthSettings) -> Self {
        Self::new(
            settings.authorize_url.clone(),
            settings.token_url.clone(),
            settings.client_id.clone(),
            settings.client_secret.clone(),
            settings.redirect_uri.clone(),
            settings.scope.clone(),
        )
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Token endpoint success body
///
/// Every field except `token_type` is required; `user_name` must be present
/// but may be empty.
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: i64,
    pub refresh_token: String,
    pub user_id: String,
    pub user_name: String,
}

impl TokenResponse {
    /// Whether the advertised token type is usable as a bearer token.
    #[must_use]
    pub fn is_bearer(&self) -> bool {
        self.token_type
            .as_deref()
            .map_or(true, |token_type| token_type.eq_ignore_ascii_case(DEFAULT_TOKEN_TYPE))
    }
}

impl TryFrom<TokenResponse> for Credential {
    type Error = CredentialError;

    fn try_from(response: TokenResponse) -> Result<Self, Self::Error> {
        Self::new(
            response.access_token,
            response.refresh_token,
            response.expires_in,
            response.user_id,
            response.user_name,
        )
    }
}

/// Failure of a token endpoint exchange
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The authorization code or refresh token is permanently unusable.
    #[error("{}", OAuth2ErrorCode::InvalidGrant.message())]
    GrantInvalid,

    /// Any other failure; `status` is absent for transport failures.
    #[error("{message}")]
    Failed { status: Option<u16>, message: String },

    #[error("Invalid OAuth configuration: {0}")]
    Configuration(String),
}

impl AuthorizationError {
    pub(crate) fn failed(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Failed { status, message: message.into() }
    }

    /// Whether the user has to log in again.
    #[must_use]
    pub const fn is_grant_invalid(&self) -> bool {
        matches!(self, Self::GrantInvalid)
    }

    /// HTTP status of the token endpoint response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Failed { status, .. } => *status,
            Self::GrantInvalid | Self::Configuration(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> Result<Credential, String> {
        let parsed: TokenResponse = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Credential::try_from(parsed).map_err(|e| e.to_string())
    }

    #[test]
    fn test_complete_response_becomes_credential() {
        let credential = response(
            r#"{"access_token":"YWNjZXNz","token_type":"bearer","expires_in":3600,
                "refresh_token":"cmVmcmVzaA","user_id":"42","user_name":""}"#,
        )
        .unwrap();
        assert_eq!(credential.access_token(), "YWNjZXNz");
        assert_eq!(credential.user_id(), "42");
        assert_eq!(credential.user_name(), "");
    }

    #[test]
    fn test_incomplete_responses_never_yield_credentials() {
        // missing user_name
        assert!(response(
            r#"{"access_token":"a","expires_in":3600,"refresh_token":"r","user_id":"u"}"#
        )
        .is_err());
        // non-integer lifetime
        assert!(response(
            r#"{"access_token":"a","expires_in":"3600","refresh_token":"r","user_id":"u","user_name":"n"}"#
        )
        .is_err());
        // non-positive lifetime
        assert!(response(
            r#"{"access_token":"a","expires_in":0,"refresh_token":"r","user_id":"u","user_name":"n"}"#
        )
        .is_err());
        // empty access token
        assert!(response(
            r#"{"access_token":"","expires_in":60,"refresh_token":"r","user_id":"u","user_name":"n"}"#
        )
        .is_err());
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = OAuthConfig::new("a", "t", "id", "s3cr3t", "r", "api");
        assert!(!format!("{config:?}").contains("s3cr3t"));
    }

    #[test]
    fn test_grant_invalid_message() {
        let message = AuthorizationError::GrantInvalid.to_string();
        assert!(message.contains("expired"));
        assert!(AuthorizationError::GrantInvalid.is_grant_invalid());
        assert!(!AuthorizationError::failed(Some(500), "boom").is_grant_invalid());
    }
}
