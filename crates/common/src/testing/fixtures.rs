//! Credential fixtures

// Fixtures are only built from literals known to be valid.
#![allow(clippy::expect_used)]

use meridian_domain::Credential;

/// A valid one-hour credential for `user-1` with the given access token.
///
/// The refresh token is `<access>-refresh`.
#[must_use]
pub fn credential(access_token: &str) -> Credential {
    credential_for(access_token, "user-1")
}

/// A valid one-hour credential for `user_id`.
#[must_use]
pub fn credential_for(access_token: &str, user_id: &str) -> Credential {
    Credential::new(access_token, format!("{access_token}-refresh"), 3600, user_id, "Test User")
        .expect("fixture credential must be valid")
}
