//! In-memory representation cache backed by `DashMap`

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

/// Opaque, unguessable cache entry id (random UUIDv4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheId(Uuid);

impl CacheId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for CacheId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A cached representation and its media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedRepresentation {
    pub representation: String,
    pub media_type: String,
}

#[derive(Debug)]
struct Entry {
    value: CachedRepresentation,
    stored_at: Instant,
}

/// Lifetime of entries in a cache built with [`RepresentationCache::new`]
pub const DEFAULT_REPRESENTATION_TTL: Duration = Duration::from_secs(300);

/// Thread-safe single-use store
///
/// Entries can only be read by removing them. Expired entries are dropped
/// on the next `put`, so entries that are never taken do not accumulate.
#[derive(Debug)]
pub struct RepresentationCache {
    entries: DashMap<CacheId, Entry>,
    ttl: Option<Duration>,
}

impl RepresentationCache {
    /// Create a cache whose entries expire after
    /// [`DEFAULT_REPRESENTATION_TTL`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_REPRESENTATION_TTL)
    }

    /// Create a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { entries: DashMap::new(), ttl: Some(ttl) }
    }

    /// Create a cache whose entries never expire.
    ///
    /// Entries that are never taken stay until [`RepresentationCache::take`]
    /// is called for them.
    #[must_use]
    pub fn without_expiry() -> Self {
        Self { entries: DashMap::new(), ttl: None }
    }

    /// Store a representation and return its id.
    pub fn put(&self, representation: impl Into<String>, media_type: impl Into<String>) -> CacheId {
        if self.ttl.is_some() {
            let purged = self.purge_expired();
            if purged > 0 {
                debug!(purged, "Dropped expired representations");
            }
        }

        let id = CacheId::generate();
        let value = CachedRepresentation {
            representation: representation.into(),
            media_type: media_type.into(),
        };
        self.entries.insert(id, Entry { value, stored_at: Instant::now() });
        debug!(cache_id = %id, "Cached representation");
        id
    }

    /// Remove and return the entry for `id`.
    ///
    /// Returns `None` for unknown, already taken, or expired ids.
    pub fn take(&self, id: &CacheId) -> Option<CachedRepresentation> {
        let (_, entry) = self.entries.remove(id)?;
        if self.is_expired(&entry) {
            debug!(cache_id = %id, "Cached representation expired");
            return None;
        }
        Some(entry.value)
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !self.is_expired(entry));
        before.saturating_sub(self.entries.len())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        self.ttl.is_some_and(|ttl| entry.stored_at.elapsed() >= ttl)
    }
}

impl Default for RepresentationCache {
    fn default() -> Self {
        Self::new()
    }
}
