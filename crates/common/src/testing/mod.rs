//! Testing utilities and helpers
//!
//! - **[`mocks`]**: scriptable implementations of the auth traits
//! - **[`fixtures`]**: ready-made credentials
//!
//! ## Usage
//!
//! ```rust
//! use meridian_common::testing::{credential, MockAuthorizationClient};
//!
//! let client = MockAuthorizationClient::new();
//! client.push_refresh_result(Ok(credential("fresh-access")));
//! assert_eq!(client.refresh_calls(), 0);
//! ```

pub mod fixtures;
pub mod mocks;

pub use fixtures::{credential, credential_for};
pub use mocks::{MockAuthorizationClient, MockSessionStore};
