//! # Meridian Core
//!
//! Request protocol layer - no transport dependencies.
//!
//! This crate contains:
//! - The resource fetch port ([`ResourceFetcher`])
//! - The two-attempt refresh-once protocol ([`RetryCoordinator`])
//! - Paginated segments tree aggregation ([`PageAggregator`])
//!
//! ## Architecture Principles
//! - Depends on `meridian-common` and `meridian-domain` only
//! - No HTTP code; the transport is supplied through the port
//! - Session state is passed in explicitly ([`SessionContext`]), never global

pub mod resources;
pub mod segments;

pub use resources::{
    FetchError, RequestError, ResourceFetcher, RetryCoordinator, RetryDecision, SessionContext,
};
pub use segments::{AggregationError, PageAggregator};
