//! Modular common utilities shared across Meridian crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: failure classification (reason phrases, bearer challenges,
//!   OAuth2 error envelopes)
//! - `runtime`: async infrastructure (single-use representation cache)
//! - `platform`: OAuth2 authorization client, credential store, session store
//! - `test-utils`: scriptable mocks for the platform traits
//! - `observability`: tracing (pulled in by `runtime`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod classify;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod cache;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", all(test, feature = "platform")))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use cache::{CacheId, CachedRepresentation, RepresentationCache};
#[cfg(feature = "foundation")]
pub use classify::{
    classify_oauth_error, classify_response, classify_transport, parse_reason_phrase,
    OAuth2Classification, OAuth2ErrorCode, ParsedReason, ResponseFailure,
};
