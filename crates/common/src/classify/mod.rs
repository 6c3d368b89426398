//! Classification of failed remote calls
//!
//! Turns a failed HTTP exchange into a [`ClassifiedError`]. The classifier is
//! pure: it never performs I/O and never decides whether to retry.
//!
//! - **[`reason`]**: vendor `(DOMAIN_ERROR=<n>)` suffixes in reason phrases
//! - **[`challenge`]**: `WWW-Authenticate` bearer challenges
//! - **[`oauth`]**: RFC 6749 token endpoint error envelopes

pub mod challenge;
pub mod oauth;
pub mod reason;

use meridian_domain::{ClassifiedError, DomainErrorCode};

pub use challenge::{is_invalid_bearer_token, parse_challenges, Challenge};
pub use oauth::{classify_oauth_error, OAuth2Classification, OAuth2ErrorCode};
pub use reason::{parse_reason_phrase, ParsedReason};

const BODY_MESSAGE_LIMIT: usize = 200;

/// The parts of a failed response the classifier looks at
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFailure<'a> {
    pub status: u16,
    /// Reason phrase as sent by the server
    pub reason: &'a str,
    /// `WWW-Authenticate` header value(s), comma-joined
    pub www_authenticate: Option<&'a str>,
    /// Response body, used only when the reason phrase is empty
    pub body: Option<&'a str>,
}

impl<'a> ResponseFailure<'a> {
    #[must_use]
    pub const fn new(status: u16, reason: &'a str) -> Self {
        Self { status, reason, www_authenticate: None, body: None }
    }

    #[must_use]
    pub fn with_www_authenticate(mut self, header: Option<&'a str>) -> Self {
        self.www_authenticate = header;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Option<&'a str>) -> Self {
        self.body = body;
        self
    }
}

/// Classify a non-success response.
///
/// - 401 with a `Bearer` challenge carrying `error="invalid_token"` is
///   [`ClassifiedError::CredentialRejected`]; any other 401 is a protocol error.
/// - 403 with the tenancy/application blacklist code is
///   [`ClassifiedError::PolicyBlocked`].
/// - Everything else is [`ClassifiedError::ProtocolError`].
#[must_use]
pub fn classify_response(failure: &ResponseFailure<'_>) -> ClassifiedError {
    let parsed = parse_reason_phrase(failure.reason);
    let message = display_message(failure, parsed.message);
    let status = failure.status;

    if status == 401 && failure.www_authenticate.is_some_and(is_invalid_bearer_token) {
        return ClassifiedError::CredentialRejected { status, message };
    }

    if status == 403 && parsed.domain_code == Some(DomainErrorCode::TenancyAppBlacklisted) {
        return ClassifiedError::PolicyBlocked {
            status,
            domain_code: DomainErrorCode::TenancyAppBlacklisted,
            message,
        };
    }

    ClassifiedError::ProtocolError {
        status,
        domain_code: parsed.domain_code,
        raw_code: parsed.raw_code,
        message,
    }
}

/// Classify a failure where no response was received at all.
#[must_use]
pub fn classify_transport(message: impl Into<String>) -> ClassifiedError {
    ClassifiedError::TransportFailure { message: message.into() }
}

fn display_message(failure: &ResponseFailure<'_>, stripped: String) -> String {
    if !stripped.trim().is_empty() {
        return stripped;
    }

    match failure.body.map(str::trim).filter(|body| !body.is_empty()) {
        Some(body) => body.chars().take(BODY_MESSAGE_LIMIT).collect(),
        None => format!("Request failed with HTTP status {}", failure.status),
    }
}
