//! Port interfaces for resource fetching
//!
//! These traits define the boundary between the request protocol and the
//! HTTP transport implementation.

use async_trait::async_trait;
use meridian_domain::{
    ClassifiedError, Credential, MediaTypeError, RepresentationFormat, ResourceEnvelope,
};
use thiserror::Error;

/// Failure of a single fetch attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a failure, or could not be reached
    #[error(transparent)]
    Classified(#[from] ClassifiedError),

    /// A successful response whose media type names no known resource kind
    #[error(transparent)]
    UnknownResourceKind(#[from] MediaTypeError),
}

impl FetchError {
    /// The classified remote failure, if this is one.
    #[must_use]
    pub const fn classified(&self) -> Option<&ClassifiedError> {
        match self {
            Self::Classified(err) => Some(err),
            Self::UnknownResourceKind(_) => None,
        }
    }
}

/// Trait for fetching one resource representation
///
/// Implementations perform exactly one request and never retry.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch `uri` with `credential` as bearer token, asking for `format`.
    async fn fetch(
        &self,
        uri: &str,
        credential: &Credential,
        format: RepresentationFormat,
    ) -> Result<ResourceEnvelope, FetchError>;
}
