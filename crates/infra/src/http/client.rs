use std::time::Duration;

use meridian_domain::{HttpSettings, MeridianError};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// Single-attempt HTTP client with a request timeout.
///
/// Retrying is decided by the request protocol above this layer, never here.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    ///
    /// # Errors
    /// Returns [`MeridianError::Network`] if the TLS backend cannot be
    /// initialised.
    pub fn new() -> Result<Self, MeridianError> {
        Self::builder().build()
    }

    /// Build a client from configured transport settings.
    ///
    /// # Errors
    /// See [`HttpClient::new`].
    pub fn from_settings(settings: &HttpSettings) -> Result<Self, MeridianError> {
        Self::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(settings.user_agent.clone())
            .build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    ///
    /// Any received response is returned, whatever its status.
    ///
    /// # Errors
    /// Returns [`MeridianError::Network`] when the request cannot be built or
    /// no response is received (DNS, connect, timeout).
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, MeridianError> {
        let request = builder.build().map_err(|err| MeridianError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(meridian_domain::constants::DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// Returns [`MeridianError::Network`] if reqwest rejects the configuration.
    pub fn build(self) -> Result<HttpClient, MeridianError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| MeridianError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}
