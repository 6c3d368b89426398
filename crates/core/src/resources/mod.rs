//! Resource fetching with credential refresh
//!
//! [`ports`] defines the transport boundary; [`retry`] decides, once per
//! logical request, whether a rejected credential is refreshed and the
//! request retried.

pub mod ports;
pub mod retry;

pub use ports::{FetchError, ResourceFetcher};
pub use retry::{RequestError, RetryCoordinator, RetryDecision, SessionContext};
