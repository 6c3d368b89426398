//! Resource API client
//!
//! Implements the [`meridian_core::ResourceFetcher`] port over the shared
//! [`crate::http::HttpClient`].
//!
//! # Architecture
//!
//! - One request per fetch; no retry, no circuit breaking
//! - Failures are classified from status, reason phrase, challenge and body
//! - Transport failures and unexpected statuses are logged here

pub mod client;
pub mod errors;

pub use client::ResourceClient;
pub use errors::FailedResponse;
