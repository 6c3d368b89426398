//! Single-use cache for fetched representations
//!
//! Holds a representation between the request that fetched it and the
//! request that consumes it (for example a follow-up export). Entries are
//! addressed by unguessable random ids and removed on first read. Entries
//! that are never read expire ([`DEFAULT_REPRESENTATION_TTL`] by default).
//!
//! # Examples
//!
//! ```
//! use meridian_common::cache::RepresentationCache;
//!
//! let cache = RepresentationCache::new();
//! let id = cache.put("{}", "application/vnd.meridian.api.service+json");
//!
//! let entry = cache.take(&id).unwrap();
//! assert_eq!(entry.media_type, "application/vnd.meridian.api.service+json");
//! assert!(cache.take(&id).is_none());
//! ```

mod representation;

pub use representation::{
    CacheId, CachedRepresentation, RepresentationCache, DEFAULT_REPRESENTATION_TTL,
};
