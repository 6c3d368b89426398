//! Integration tests for failure classification
//!
//! Exercises the public classifier API the way the transport layer uses it.

#![cfg(feature = "foundation")]

use meridian_common::classify::{
    classify_oauth_error, classify_response, parse_reason_phrase, ResponseFailure,
};
use meridian_domain::{ClassifiedError, DomainErrorCode};

/// Validates the documented reason-phrase scenarios.
///
/// # Test Steps
/// 1. Parse a reason with a well-formed vendor suffix
/// 2. Parse a reason whose suffix lacks the leading space
/// 3. Re-parse the stripped message
#[test]
fn test_reason_phrase_scenarios() {
    let parsed = parse_reason_phrase("The specified EULA identifier is too long. (DOMAIN_ERROR=800)");
    assert_eq!(parsed.message, "The specified EULA identifier is too long.");
    assert_eq!(parsed.domain_code.map(DomainErrorCode::code), Some(800));

    let malformed = "Close, but no cigar.(DOMAIN_ERROR=100)";
    let parsed_malformed = parse_reason_phrase(malformed);
    assert_eq!(parsed_malformed.message, malformed);
    assert_eq!(parsed_malformed.domain_code, None);

    let again = parse_reason_phrase(&parsed.message);
    assert_eq!(again.message, parsed.message);
    assert_eq!(again.domain_code, None);
}

/// Validates that a classified response carries everything needed for
/// display: status, domain code and a clean message.
#[test]
fn test_classified_error_is_displayable() {
    let err = classify_response(&ResponseFailure::new(
        404,
        "The requested resource does not exist. (DOMAIN_ERROR=201)",
    ));

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.domain_code(), Some(DomainErrorCode::ResourceNotFound));
    assert_eq!(err.message(), "The requested resource does not exist.");
    assert_eq!(err.to_string(), "The requested resource does not exist. (HTTP 404)");
}

/// Validates the bearer rejection path with a realistic header.
#[test]
fn test_expired_token_challenge() {
    let err = classify_response(
        &ResponseFailure::new(401, "Unauthorized").with_www_authenticate(Some(
            r#"Bearer realm="api", error="invalid_token", error_description="The access token expired""#,
        )),
    );
    assert!(err.is_credential_rejected());
    assert!(matches!(err, ClassifiedError::CredentialRejected { status: 401, .. }));
}

/// Validates the OAuth2 `invalid_grant` scenario.
#[test]
fn test_oauth_invalid_grant() {
    let classification = classify_oauth_error(r#"{"error":"invalid_grant"}"#).unwrap();
    assert!(classification.is_grant_invalid);
    assert!(classification.message.contains("revoked"));
}
