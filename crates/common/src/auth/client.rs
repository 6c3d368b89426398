//! OAuth2 authorization client
//!
//! Talks to the token endpoint on behalf of a confidential client:
//! - Authorization URL building (redirect flow data contract only)
//! - Authorization code exchange
//! - Refresh token exchange
//!
//! The client authenticates with HTTP Basic auth and never retries.

use std::time::Duration;

use async_trait::async_trait;
use meridian_domain::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use meridian_domain::Credential;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::traits::AuthorizationClientTrait;
use super::types::{AuthorizationError, OAuthConfig, TokenResponse};
use crate::classify::classify_oauth_error;

/// OAuth2 client for the Meridian authorization server
#[derive(Debug, Clone)]
pub struct AuthorizationClient {
    config: OAuthConfig,
    client: Client,
}

impl AuthorizationClient {
    /// Create a new authorization client with the given configuration
    ///
    /// # Examples
    /// ```
    /// use meridian_common::auth::{AuthorizationClient, OAuthConfig};
    ///
    /// let config = OAuthConfig::new(
    ///     "https://auth.example.com/authorize",
    ///     "https://auth.example.com/token",
    ///     "client_id",
    ///     "client_secret",
    ///     "https://app.example.com/callback",
    ///     "api",
    /// );
    /// let client = AuthorizationClient::new(config);
    /// assert_eq!(client.redirect_uri(), "https://app.example.com/callback");
    /// ```
    #[must_use]
    pub fn new(config: OAuthConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { config, client }
    }

    /// Create a client that shares an existing `reqwest` client.
    #[must_use]
    pub fn with_http_client(config: OAuthConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Build the browser authorization URL for the redirect flow
    ///
    /// # Arguments
    /// * `state` - CSRF token from [`super::generate_state`]; validate it on
    ///   the callback with [`super::validate_state`]
    ///
    /// # Errors
    /// Returns [`AuthorizationError::Configuration`] if the configured
    /// authorize URL is not a valid URL
    pub fn authorization_url(&self, state: &str) -> Result<String, AuthorizationError> {
        let url = Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", self.config.scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| AuthorizationError::Configuration(format!("authorize URL: {e}")))?;

        Ok(url.into())
    }

    /// Exchange an authorization code for a credential
    ///
    /// # Errors
    /// See [`AuthorizationClientTrait::exchange_code`]
    #[instrument(skip(self, code))]
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<Credential, AuthorizationError> {
        let credential = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .await?;
        info!(user_id = %credential.user_id(), "Authorization code exchanged");
        Ok(credential)
    }

    /// Exchange a refresh token for a new credential
    ///
    /// # Errors
    /// See [`AuthorizationClientTrait::exchange_refresh_token`]
    #[instrument(skip(self, refresh_token))]
    pub async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Credential, AuthorizationError> {
        if refresh_token.is_empty() {
            return Err(AuthorizationError::failed(None, "No refresh token available"));
        }

        let credential = self
            .request_token(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
            .await?;
        info!(user_id = %credential.user_id(), "Refresh token exchanged");
        Ok(credential)
    }

    /// Get the configured redirect URI
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.config.redirect_uri
    }

    /// Get a reference to the OAuth configuration
    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    async fn request_token(
        &self,
        form: &[(&str, &str)],
    ) -> Result<Credential, AuthorizationError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Token endpoint unreachable");
                AuthorizationError::failed(
                    None,
                    format!("Unable to reach the authorization server: {e}"),
                )
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(error = %e, status = status.as_u16(), "Failed to read token endpoint response");
            AuthorizationError::failed(Some(status.as_u16()), format!("Failed to read response: {e}"))
        })?;

        if status == StatusCode::OK {
            return parse_token_response(&body);
        }

        Err(classify_failure(status, &body))
    }
}

fn parse_token_response(body: &str) -> Result<Credential, AuthorizationError> {
    let invalid = |reason: String| {
        warn!(reason = %reason, "Rejected token endpoint response");
        AuthorizationError::failed(Some(200), format!("Invalid token response: {reason}"))
    };

    let response: TokenResponse =
        serde_json::from_str(body).map_err(|e| invalid(e.to_string()))?;
    if !response.is_bearer() {
        return Err(invalid("token type is not bearer".to_string()));
    }
    Credential::try_from(response).map_err(|e| invalid(e.to_string()))
}

fn classify_failure(status: StatusCode, body: &str) -> AuthorizationError {
    let code = status.as_u16();
    let structured = matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::INTERNAL_SERVER_ERROR
    );

    match structured.then(|| classify_oauth_error(body)).flatten() {
        Some(classification) if classification.is_grant_invalid => {
            info!(status = code, "Authorization grant expired or invalid");
            AuthorizationError::GrantInvalid
        }
        Some(classification) => {
            warn!(status = code, error = %classification.code, "Token endpoint rejected request");
            AuthorizationError::failed(Some(code), classification.message)
        }
        None => {
            debug!(status = code, "Token endpoint returned an unstructured error");
            AuthorizationError::failed(
                Some(code),
                format!(
                    "Authorization failed with HTTP {} {}",
                    code,
                    status.canonical_reason().unwrap_or("error")
                ),
            )
        }
    }
}

#[async_trait]
impl AuthorizationClientTrait for AuthorizationClient {
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<Credential, AuthorizationError> {
        self.exchange_code(code, redirect_uri).await
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Credential, AuthorizationError> {
        self.exchange_refresh_token(refresh_token).await
    }
}
