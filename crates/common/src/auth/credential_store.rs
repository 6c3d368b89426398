//! Credential store for one user session
//!
//! Holds the session's bearer [`Credential`] in memory and mirrors it into
//! the session collaborator. Credentials are only ever replaced wholesale.
//!
//! Refresh-and-replace is serialized per store: a request that saw its
//! access token rejected enters the refresh gate, and if another request
//! already refreshed in the meantime it reuses that credential instead of
//! spending the (single-use) refresh token again.

use std::future::Future;
use std::sync::Arc;

use meridian_domain::Credential;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument, warn};

use super::traits::SessionStoreTrait;

/// Session key the credential is persisted under
pub const CREDENTIAL_SESSION_KEY: &str = "meridian.credential";

/// Error type for credential store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialStoreError {
    /// Session collaborator failed
    #[error("Session storage error: {0}")]
    Session(String),

    /// Credential could not be (de)serialized
    #[error("Stored credential is invalid: {0}")]
    Serialization(String),

    /// No credential in the store
    #[error("Not authenticated")]
    NotAuthenticated,
}

/// Credential store with per-session refresh serialization
pub struct CredentialStore {
    session: Arc<dyn SessionStoreTrait>,
    current: RwLock<Option<Credential>>,
    refresh_gate: Mutex<()>,
}

impl CredentialStore {
    /// Create an empty store backed by `session`
    ///
    /// Call [`CredentialStore::initialize`] to pick up a credential persisted
    /// by an earlier request of the same session.
    #[must_use]
    pub fn new(session: Arc<dyn SessionStoreTrait>) -> Self {
        Self { session, current: RwLock::new(None), refresh_gate: Mutex::new(()) }
    }

    /// Load a persisted credential from the session
    ///
    /// A record that no longer validates is discarded rather than loaded
    /// partially.
    ///
    /// # Returns
    /// `true` if a credential was loaded
    ///
    /// # Errors
    /// Returns error if the session collaborator fails
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<bool, CredentialStoreError> {
        let Some(record) = self
            .session
            .load(CREDENTIAL_SESSION_KEY)
            .await
            .map_err(CredentialStoreError::Session)?
        else {
            debug!("No credential in session");
            return Ok(false);
        };

        match serde_json::from_str::<Credential>(&record) {
            Ok(credential) => {
                info!(user_id = %credential.user_id(), "Loaded credential from session");
                *self.current.write().await = Some(credential);
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Discarding invalid credential record");
                self.session
                    .remove(CREDENTIAL_SESSION_KEY)
                    .await
                    .map_err(CredentialStoreError::Session)?;
                Ok(false)
            }
        }
    }

    /// Current credential, if any.
    pub async fn get(&self) -> Option<Credential> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Replace the credential wholesale
    ///
    /// # Errors
    /// Returns error if persisting to the session fails; the in-memory
    /// credential is left unchanged in that case
    #[instrument(skip(self, credential), fields(user_id = %credential.user_id()))]
    pub async fn set(&self, credential: Credential) -> Result<(), CredentialStoreError> {
        let record = serde_json::to_string(&credential)
            .map_err(|e| CredentialStoreError::Serialization(e.to_string()))?;
        self.session
            .save(CREDENTIAL_SESSION_KEY, record)
            .await
            .map_err(CredentialStoreError::Session)?;

        *self.current.write().await = Some(credential);
        debug!("Credential replaced");
        Ok(())
    }

    /// Remove the credential and rotate the session identifier
    ///
    /// # Errors
    /// Returns error if the session collaborator fails; the in-memory
    /// credential is removed regardless
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CredentialStoreError> {
        *self.current.write().await = None;
        self.session.remove(CREDENTIAL_SESSION_KEY).await.map_err(CredentialStoreError::Session)?;
        self.session.regenerate_id().await.map_err(CredentialStoreError::Session)?;
        info!("Credential cleared, session identifier regenerated");
        Ok(())
    }

    /// Refresh the credential unless another request already did
    ///
    /// Runs inside the store's refresh gate. If the current access token no
    /// longer equals `stale_access_token`, the current credential is returned
    /// without calling `refresher`. Otherwise `refresher` receives the
    /// current credential and its result replaces it.
    ///
    /// # Errors
    /// Returns the refresher's error, or a store error converted into `E`
    /// (including [`CredentialStoreError::NotAuthenticated`] when the store
    /// was cleared in the meantime)
    pub async fn refresh_if_current<F, Fut, E>(
        &self,
        stale_access_token: &str,
        refresher: F,
    ) -> Result<Credential, E>
    where
        F: FnOnce(Credential) -> Fut + Send,
        Fut: Future<Output = Result<Credential, E>> + Send,
        E: From<CredentialStoreError>,
    {
        self.refresh_or_clear_if_current(stale_access_token, refresher, |_| false).await
    }

    /// Like [`CredentialStore::refresh_if_current`], but clears the store
    /// before leaving the gate when `ends_session` holds for the refresher's
    /// error.
    ///
    /// Requests waiting at the gate therefore observe an empty store, never
    /// the credential whose refresh token was just refused.
    ///
    /// # Errors
    /// Same as [`CredentialStore::refresh_if_current`]. A failure to clear is
    /// logged and the refresher's error is returned.
    pub async fn refresh_or_clear_if_current<F, Fut, E, P>(
        &self,
        stale_access_token: &str,
        refresher: F,
        ends_session: P,
    ) -> Result<Credential, E>
    where
        F: FnOnce(Credential) -> Fut + Send,
        Fut: Future<Output = Result<Credential, E>> + Send,
        E: From<CredentialStoreError>,
        P: FnOnce(&E) -> bool + Send,
    {
        let _gate = self.refresh_gate.lock().await;

        let current = self.get().await.ok_or(CredentialStoreError::NotAuthenticated)?;
        if current.access_token() != stale_access_token {
            debug!(user_id = %current.user_id(), "Credential already refreshed by another request");
            return Ok(current);
        }

        let refreshed = match refresher(current).await {
            Ok(refreshed) => refreshed,
            Err(err) => {
                if ends_session(&err) {
                    if let Err(clear_err) = self.clear().await {
                        error!(error = %clear_err, "Failed to clear session after refresh failure");
                    }
                }
                return Err(err);
            }
        };
        self.set(refreshed.clone()).await?;
        info!(
            user_id = %refreshed.user_id(),
            expires_in = refreshed.expires_in(),
            "Credential refreshed"
        );
        Ok(refreshed)
    }
}
