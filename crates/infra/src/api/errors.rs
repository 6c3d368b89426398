//! Failure extraction from HTTP responses
//!
//! Collects the parts of a non-success response the classifier needs. The
//! reason phrase is taken as sent by the server: hyper exposes a
//! non-canonical phrase as a response extension, and the canonical phrase
//! for the status is used otherwise.

use hyper::ext::ReasonPhrase;
use meridian_common::classify::{classify_response, ResponseFailure};
use meridian_domain::ClassifiedError;
use reqwest::header::WWW_AUTHENTICATE;
use reqwest::Response;

/// An owned snapshot of a failed response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedResponse {
    pub status: u16,
    pub reason: String,
    /// All `WWW-Authenticate` values, comma-joined
    pub www_authenticate: Option<String>,
    pub body: Option<String>,
}

impl FailedResponse {
    /// Consume a response, reading its body.
    ///
    /// A body that cannot be read is treated as absent.
    pub async fn read(response: Response) -> Self {
        let status = response.status();
        let reason = response
            .extensions()
            .get::<ReasonPhrase>()
            .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned())
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_default();

        let challenges: Vec<&str> = response
            .headers()
            .get_all(WWW_AUTHENTICATE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        let www_authenticate = (!challenges.is_empty()).then(|| challenges.join(", "));

        let body = response.text().await.ok().filter(|body| !body.is_empty());

        Self { status: status.as_u16(), reason, www_authenticate, body }
    }

    #[must_use]
    pub fn classify(&self) -> ClassifiedError {
        classify_response(
            &ResponseFailure::new(self.status, &self.reason)
                .with_www_authenticate(self.www_authenticate.as_deref())
                .with_body(self.body.as_deref()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(status: u16, reason: &str, challenge: Option<&str>) -> FailedResponse {
        FailedResponse {
            status,
            reason: reason.to_string(),
            www_authenticate: challenge.map(str::to_string),
            body: None,
        }
    }

    #[test]
    fn test_classifies_expired_token() {
        let err = failure(401, "Unauthorized", Some(r#"Bearer error="invalid_token""#)).classify();
        assert!(err.is_credential_rejected());
    }

    #[test]
    fn test_classifies_domain_code() {
        let err = failure(404, "Not here (DOMAIN_ERROR=201)", None).classify();
        assert_eq!(err.message(), "Not here");
        assert_eq!(err.domain_code(), Some(meridian_domain::DomainErrorCode::ResourceNotFound));
    }
}
