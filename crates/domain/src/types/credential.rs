//! Bearer credential held by one user session

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CredentialError;

/// OAuth2 bearer credential for the signed-in user
///
/// A credential is either fully populated or does not exist: every
/// constructor (including deserialization) validates all fields. Refreshing
/// replaces the whole value; there are no setters.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CredentialRecord", into = "CredentialRecord")]
pub struct Credential {
    access_token: String,
    issued_at: DateTime<Utc>,
    expires_in: i64,
    refresh_token: String,
    user_id: String,
    user_name: String,
}

/// Persisted shape of a [`Credential`]
#[derive(Clone, Serialize, Deserialize)]
struct CredentialRecord {
    access_token: String,
    issued_at: DateTime<Utc>,
    expires_in: i64,
    refresh_token: String,
    user_id: String,
    user_name: String,
}

impl Credential {
    /// Create a credential issued now.
    ///
    /// # Errors
    /// Returns [`CredentialError`] if any token or the user id is empty, or
    /// the lifetime is not positive. An empty `user_name` is accepted.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: i64,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        Self::issued_at(access_token, refresh_token, expires_in, user_id, user_name, Utc::now())
    }

    /// Create a credential with an explicit issuance timestamp.
    ///
    /// # Errors
    /// Same validation as [`Credential::new`].
    pub fn issued_at(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: i64,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Result<Self, CredentialError> {
        CredentialRecord {
            access_token: access_token.into(),
            issued_at,
            expires_in,
            refresh_token: refresh_token.into(),
            user_id: user_id.into(),
            user_name: user_name.into(),
        }
        .try_into()
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    #[must_use]
    pub const fn issued_at_time(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Access token lifetime in seconds
    #[must_use]
    pub const fn expires_in(&self) -> i64 {
        self.expires_in
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Absolute expiry of the access token.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + Duration::seconds(self.expires_in)
    }

    /// Whether the access token is expired or expires within `threshold_seconds`.
    #[must_use]
    pub fn is_expired(&self, threshold_seconds: i64) -> bool {
        Utc::now() + Duration::seconds(threshold_seconds) >= self.expires_at()
    }

    /// Seconds until the access token expires (negative once expired).
    #[must_use]
    pub fn seconds_until_expiry(&self) -> i64 {
        (self.expires_at() - Utc::now()).num_seconds()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("user_name", &self.user_name)
            .finish()
    }
}

impl TryFrom<CredentialRecord> for Credential {
    type Error = CredentialError;

    fn try_from(record: CredentialRecord) -> Result<Self, Self::Error> {
        if record.access_token.trim().is_empty() {
            return Err(CredentialError::MissingField("access_token"));
        }
        if record.refresh_token.trim().is_empty() {
            return Err(CredentialError::MissingField("refresh_token"));
        }
        if record.user_id.trim().is_empty() {
            return Err(CredentialError::MissingField("user_id"));
        }
        if record.expires_in <= 0 {
            return Err(CredentialError::NonPositiveLifetime(record.expires_in));
        }

        Ok(Self {
            access_token: record.access_token,
            issued_at: record.issued_at,
            expires_in: record.expires_in,
            refresh_token: record.refresh_token,
            user_id: record.user_id,
            user_name: record.user_name,
        })
    }
}

impl From<Credential> for CredentialRecord {
    fn from(credential: Credential) -> Self {
        Self {
            access_token: credential.access_token,
            issued_at: credential.issued_at,
            expires_in: credential.expires_in,
            refresh_token: credential.refresh_token,
            user_id: credential.user_id,
            user_name: credential.user_name,
        }
    }
}
