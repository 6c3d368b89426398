//! OAuth2 token endpoint error envelopes (RFC 6749 §5.2)

use meridian_domain::impl_wire_token_conversions;
use serde::Deserialize;

/// Error identifiers the token endpoint may return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OAuth2ErrorCode {
    InvalidRequest,
    InvalidClient,
    InvalidGrant,
    InvalidScope,
    UnsupportedGrantType,
    UnauthorizedClient,
    ServerError,
}

impl_wire_token_conversions!(OAuth2ErrorCode {
    InvalidRequest => "invalid_request",
    InvalidClient => "invalid_client",
    InvalidGrant => "invalid_grant",
    InvalidScope => "invalid_scope",
    UnsupportedGrantType => "unsupported_grant_type",
    UnauthorizedClient => "unauthorized_client",
    ServerError => "server_error",
});

impl OAuth2ErrorCode {
    /// Human-readable explanation shown to the user.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "The authorization request was malformed or incomplete.",
            Self::InvalidClient => "The client application could not be authenticated.",
            Self::InvalidGrant => {
                "The authorization grant or refresh token is expired, invalid or has been revoked."
            }
            Self::InvalidScope => "The requested scope is invalid or unknown.",
            Self::UnsupportedGrantType => {
                "The authorization server does not support this grant type."
            }
            Self::UnauthorizedClient => {
                "The client application is not authorized to use this grant type."
            }
            Self::ServerError => "The authorization server encountered an unexpected error.",
        }
    }
}

/// A recognized OAuth2 error envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth2Classification {
    pub code: OAuth2ErrorCode,
    pub message: &'static str,
    /// The grant is permanently unusable; callers should force a new login.
    pub is_grant_invalid: bool,
}

#[derive(Debug, Deserialize)]
struct OAuth2ErrorEnvelope {
    error: String,
}

/// Classify a token endpoint error body.
///
/// Returns `None` for unparsable bodies or unrecognized `error` values; the
/// caller then falls back to a status-derived message.
#[must_use]
pub fn classify_oauth_error(body: &str) -> Option<OAuth2Classification> {
    let envelope: OAuth2ErrorEnvelope = serde_json::from_str(body).ok()?;
    // Identifiers are case-sensitive on the wire.
    let code = envelope.error.parse::<OAuth2ErrorCode>().ok()?;
    if code.as_token() != envelope.error {
        return None;
    }

    Some(OAuth2Classification {
        code,
        message: code.message(),
        is_grant_invalid: code == OAuth2ErrorCode::InvalidGrant,
    })
}
