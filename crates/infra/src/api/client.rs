//! Resource client
//!
//! Fetches one resource representation with a bearer credential.

use async_trait::async_trait;
use meridian_common::classify::classify_transport;
use meridian_core::{FetchError, ResourceFetcher};
use meridian_domain::{
    Credential, HttpSettings, MediaTypeError, MeridianError, RepresentationFormat,
    ResourceEnvelope,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use tracing::{debug, instrument, warn};

use super::errors::FailedResponse;
use crate::http::HttpClient;

/// [`ResourceFetcher`] over HTTP
#[derive(Clone, Debug)]
pub struct ResourceClient {
    http: HttpClient,
}

impl ResourceClient {
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Build a client with its own transport from configured settings.
    ///
    /// # Errors
    /// Returns error if the transport cannot be built
    pub fn from_settings(settings: &HttpSettings) -> Result<Self, MeridianError> {
        Ok(Self::new(HttpClient::from_settings(settings)?))
    }
}

#[async_trait]
impl ResourceFetcher for ResourceClient {
    #[instrument(skip(self, credential), fields(user_id = %credential.user_id()))]
    async fn fetch(
        &self,
        uri: &str,
        credential: &Credential,
        format: RepresentationFormat,
    ) -> Result<ResourceEnvelope, FetchError> {
        let request = self
            .http
            .request(Method::GET, uri)
            .bearer_auth(credential.access_token())
            .header(ACCEPT, format.accept_header());

        let response = match self.http.send(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Resource request did not complete");
                return Err(classify_transport(transport_message(err)).into());
            }
        };

        if response.status() != StatusCode::OK {
            let failure = FailedResponse::read(response).await;
            let classified = failure.classify();
            if classified.is_credential_rejected() {
                debug!(status = failure.status, "Access token rejected");
            } else {
                warn!(
                    status = failure.status,
                    reason = %failure.reason,
                    domain_code = ?classified.domain_code(),
                    "Resource request failed"
                );
            }
            return Err(classified.into());
        }

        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| MediaTypeError::UnknownResourceKind(String::new()))?;

        let representation = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "Failed to read resource representation");
                return Err(classify_transport(format!("Failed to read response body: {err}")).into());
            }
        };

        let envelope = ResourceEnvelope::new(representation, media_type).map_err(|err| {
            warn!(error = %err, "Response carries an unknown resource kind");
            err
        })?;
        debug!(kind = %envelope.kind(), bytes = envelope.representation().len(), "Resource fetched");
        Ok(envelope)
    }
}

fn transport_message(err: MeridianError) -> String {
    match err {
        MeridianError::Network(message) => message,
        other => other.to_string(),
    }
}
