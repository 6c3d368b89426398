//! Mock implementations of the auth traits
//!
//! Provides mock objects for testing purposes.

// Allow missing error/panic docs for test mocks - they are designed to be simple
// and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use meridian_domain::Credential;
use parking_lot::Mutex;

use super::fixtures::credential;
use crate::auth::{AuthorizationClientTrait, AuthorizationError, SessionStoreTrait};

type ScriptedResults = Arc<Mutex<VecDeque<Result<Credential, AuthorizationError>>>>;

/// Mock authorization client that simulates token exchanges without network
/// calls.
///
/// Scripted results are returned in order; once the script is exhausted each
/// refresh returns a fresh credential `refreshed-<n>`.
#[derive(Clone, Debug, Default)]
pub struct MockAuthorizationClient {
    refresh_results: ScriptedResults,
    code_results: ScriptedResults,
    refresh_calls: Arc<AtomicUsize>,
    code_calls: Arc<AtomicUsize>,
    refresh_tokens_seen: Arc<Mutex<Vec<String>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockAuthorizationClient {
    /// Create a new mock authorization client with default state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next `exchange_refresh_token` call.
    pub fn push_refresh_result(&self, result: Result<Credential, AuthorizationError>) {
        self.refresh_results.lock().push_back(result);
    }

    /// Queue the result of the next `exchange_code` call.
    pub fn push_code_result(&self, result: Result<Credential, AuthorizationError>) {
        self.code_results.lock().push_back(result);
    }

    /// Delay every exchange, to widen race windows in concurrency tests.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn code_calls(&self) -> usize {
        self.code_calls.load(Ordering::SeqCst)
    }

    /// Refresh tokens presented so far, in call order.
    #[must_use]
    pub fn refresh_tokens_seen(&self) -> Vec<String> {
        self.refresh_tokens_seen.lock().clone()
    }

    async fn pause(&self) {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AuthorizationClientTrait for MockAuthorizationClient {
    async fn exchange_code(
        &self,
        _code: &str,
        _redirect_uri: &str,
    ) -> Result<Credential, AuthorizationError> {
        let call = self.code_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.pause().await;
        let scripted = self.code_results.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(credential(&format!("code-access-{call}"))))
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Credential, AuthorizationError> {
        let call = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.refresh_tokens_seen.lock().push(refresh_token.to_string());
        self.pause().await;
        let scripted = self.refresh_results.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(credential(&format!("refreshed-{call}"))))
    }
}

/// Mock session store with switchable failures and call counters.
#[derive(Clone, Debug, Default)]
pub struct MockSessionStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    should_fail: Arc<Mutex<bool>>,
    regenerations: Arc<AtomicUsize>,
}

impl MockSessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Force every operation to fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock() = should_fail;
    }

    /// How many times the session identifier was regenerated.
    #[must_use]
    pub fn regenerations(&self) -> usize {
        self.regenerations.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn check(&self) -> Result<(), String> {
        if *self.should_fail.lock() {
            Err("session store unavailable".to_string())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SessionStoreTrait for MockSessionStore {
    async fn load(&self, key: &str) -> Result<Option<String>, String> {
        self.check()?;
        Ok(self.get(key))
    }

    async fn save(&self, key: &str, value: String) -> Result<(), String> {
        self.check()?;
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), String> {
        self.check()?;
        self.values.lock().remove(key);
        Ok(())
    }

    async fn regenerate_id(&self) -> Result<(), String> {
        self.check()?;
        self.regenerations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
