//! Application constants
//!
//! Centralized location for protocol-level constants shared by the client
//! crates.

// Reason-phrase vendor suffix: " (DOMAIN_ERROR=<integer>)"
pub const DOMAIN_ERROR_SUFFIX_OPEN: &str = " (DOMAIN_ERROR=";
pub const DOMAIN_ERROR_SUFFIX_CLOSE: &str = ")";

// Media types
pub const MEDIA_TYPE_JSON: &str = "application/json";
pub const MEDIA_TYPE_XML: &str = "application/xml";
pub const MEDIA_SUFFIX_JSON: &str = "+json";
pub const MEDIA_SUFFIX_XML: &str = "+xml";
pub const VENDOR_SUBTYPE_PREFIX: &str = "vnd.";

// OAuth2 bearer challenge
pub const BEARER_SCHEME: &str = "bearer";
pub const INVALID_TOKEN_ERROR: &str = "invalid_token";

// Credential bookkeeping
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

// HTTP defaults
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("meridian-client/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_OAUTH_SCOPE: &str = "api";
