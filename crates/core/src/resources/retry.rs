//! Two-attempt request protocol
//!
//! A logical request is fetched with the session's current credential. If
//! (and only if) the server rejects that credential, the credential is
//! refreshed once and the request fetched exactly once more. Every other
//! outcome is terminal on the attempt that produced it.
//!
//! ```text
//! attempt 1 ──ok──────────────────────────────► envelope
//!     │ CredentialRejected
//!     ▼
//! refresh ──GrantInvalid──► clear session ─────► LoggedOff
//!     │   ──other failure──────────────────────► AuthorizationFailed
//!     ▼
//! attempt 2 ──ok──────────────────────────────► envelope
//!     │ CredentialRejected ────────────────────► AccessDenied
//!     └ anything else ─────────────────────────► surfaced verbatim
//! ```

use std::sync::Arc;

use meridian_common::auth::{
    AuthorizationClientTrait, AuthorizationError, CredentialStore, CredentialStoreError,
};
use meridian_domain::{
    ClassifiedError, Credential, DomainErrorCode, MediaTypeError, RepresentationFormat,
    ResourceEnvelope,
};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::ports::{FetchError, ResourceFetcher};

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Refresh the credential and fetch once more
    RefreshAndRetry,
    /// Surface the failure
    Terminal,
}

impl RetryDecision {
    /// Decide from the failure kind alone.
    ///
    /// Only a rejected credential is recoverable. Whether a retry has already
    /// been spent is tracked by the coordinator, not here.
    #[must_use]
    pub const fn for_error(error: &FetchError) -> Self {
        match error {
            FetchError::Classified(ClassifiedError::CredentialRejected { .. }) => {
                Self::RefreshAndRetry
            }
            FetchError::Classified(_) | FetchError::UnknownResourceKind(_) => Self::Terminal,
        }
    }
}

/// Terminal outcome of a logical request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// No credential in the session; nothing was sent
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Remote failure surfaced as classified
    #[error(transparent)]
    Classified(ClassifiedError),

    #[error(transparent)]
    UnknownResourceKind(MediaTypeError),

    /// The refresh token is no longer valid; the session was cleared
    #[error("Your session has expired. Please sign in again.")]
    LoggedOff,

    /// Refreshing failed for another reason; the session is kept
    #[error("Unable to refresh the access token: {message}")]
    AuthorizationFailed { status: Option<u16>, message: String },

    /// The freshly refreshed credential was rejected as well
    #[error("Access denied: {message} (HTTP {status})")]
    AccessDenied { status: u16, message: String },

    #[error(transparent)]
    Store(CredentialStoreError),
}

impl RequestError {
    /// HTTP status of the failing response, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Classified(err) => err.status(),
            Self::AuthorizationFailed { status, .. } => *status,
            Self::AccessDenied { status, .. } => Some(*status),
            Self::NotAuthenticated
            | Self::UnknownResourceKind(_)
            | Self::LoggedOff
            | Self::Store(_) => None,
        }
    }

    /// Recognized vendor error code, if any.
    #[must_use]
    pub const fn domain_code(&self) -> Option<DomainErrorCode> {
        match self {
            Self::Classified(err) => err.domain_code(),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Classified(err) => err.message().to_string(),
            other => other.to_string(),
        }
    }

    /// Whether the session was logged off and the user must sign in again.
    #[must_use]
    pub const fn forces_logout(&self) -> bool {
        matches!(self, Self::LoggedOff)
    }
}

impl From<FetchError> for RequestError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Classified(err) => Self::Classified(err),
            FetchError::UnknownResourceKind(err) => Self::UnknownResourceKind(err),
        }
    }
}

/// Per-session collaborators of a logical request
#[derive(Clone)]
pub struct SessionContext {
    credentials: Arc<CredentialStore>,
    authorization: Arc<dyn AuthorizationClientTrait>,
}

impl SessionContext {
    #[must_use]
    pub fn new(
        credentials: Arc<CredentialStore>,
        authorization: Arc<dyn AuthorizationClientTrait>,
    ) -> Self {
        Self { credentials, authorization }
    }

    #[must_use]
    pub const fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    #[must_use]
    pub fn authorization(&self) -> &Arc<dyn AuthorizationClientTrait> {
        &self.authorization
    }
}

#[derive(Debug)]
enum RefreshFailure {
    Authorization(AuthorizationError),
    Store(CredentialStoreError),
}

impl RefreshFailure {
    const fn ends_session(&self) -> bool {
        matches!(self, Self::Authorization(AuthorizationError::GrantInvalid))
    }
}

impl From<CredentialStoreError> for RefreshFailure {
    fn from(err: CredentialStoreError) -> Self {
        Self::Store(err)
    }
}

/// Runs logical requests against a [`ResourceFetcher`]
pub struct RetryCoordinator {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl RetryCoordinator {
    /// Create a coordinator over the given transport
    #[must_use]
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch `uri` for the session, refreshing the credential at most once
    ///
    /// # Errors
    /// Returns the terminal [`RequestError`]; see the module documentation
    /// for which failure maps to which outcome
    #[instrument(skip(self, session))]
    pub async fn fetch(
        &self,
        session: &SessionContext,
        uri: &str,
        format: RepresentationFormat,
    ) -> Result<ResourceEnvelope, RequestError> {
        let credential = session.credentials.get().await.ok_or(RequestError::NotAuthenticated)?;

        let rejected = match self.fetcher.fetch(uri, &credential, format).await {
            Ok(envelope) => return Ok(envelope),
            Err(err) => match RetryDecision::for_error(&err) {
                RetryDecision::Terminal => return Err(err.into()),
                RetryDecision::RefreshAndRetry => err,
            },
        };
        debug!(error = %rejected, "Access token rejected, refreshing credential");

        let refreshed = self.refresh(session, credential.access_token()).await?;

        match self.fetcher.fetch(uri, &refreshed, format).await {
            Ok(envelope) => Ok(envelope),
            Err(FetchError::Classified(ClassifiedError::CredentialRejected { status, message })) => {
                warn!(status, "Refreshed access token rejected as well");
                Err(RequestError::AccessDenied { status, message })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn refresh(
        &self,
        session: &SessionContext,
        stale_access_token: &str,
    ) -> Result<Credential, RequestError> {
        let authorization = Arc::clone(&session.authorization);
        let result = session
            .credentials
            .refresh_or_clear_if_current(
                stale_access_token,
                |current| async move {
                    authorization
                        .exchange_refresh_token(current.refresh_token())
                        .await
                        .map_err(RefreshFailure::Authorization)
                },
                RefreshFailure::ends_session,
            )
            .await;

        match result {
            Ok(credential) => Ok(credential),
            Err(RefreshFailure::Authorization(AuthorizationError::GrantInvalid)) => {
                info!("Refresh token no longer valid, session logged off");
                Err(RequestError::LoggedOff)
            }
            Err(RefreshFailure::Authorization(err)) => {
                warn!(error = %err, "Credential refresh failed");
                Err(RequestError::AuthorizationFailed { status: err.status(), message: err.to_string() })
            }
            // The credential rejected on attempt 1 is gone: a concurrent
            // request of this session was logged off while this one waited.
            Err(RefreshFailure::Store(CredentialStoreError::NotAuthenticated)) => {
                info!("Session logged off while waiting to refresh");
                Err(RequestError::LoggedOff)
            }
            Err(RefreshFailure::Store(err)) => Err(RequestError::Store(err)),
        }
    }
}
