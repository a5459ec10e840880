//! TTL-bounded location cache.
//!
//! Maps a [`VideoId`] to the [`VideoAsset`] that a previous stat resolved,
//! so repeat requests skip the storage round-trip. Expiry is checked on
//! every read; [`LocationCache::purge_expired`] additionally lets a
//! background task drop stale entries that are never read again.

use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::asset::VideoAsset;
use crate::ids::VideoId;

/// Entry in the location cache.
struct CacheEntry {
    asset: Arc<VideoAsset>,
    created_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() < ttl
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Thread-safe TTL cache of resolved video locations.
///
/// Reads take a shared shard lock only, so concurrent lookups never wait on
/// each other. Assets are stored behind `Arc`, so a writer either installs a
/// complete entry or nothing; two racing `set`s for one key end with the
/// later one.
pub struct LocationCache {
    entries: DashMap<VideoId, CacheEntry>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LocationCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the live entry for `id`, if any.
    pub fn get(&self, id: &VideoId) -> Option<Arc<VideoAsset>> {
        let expired = match self.entries.get(id) {
            Some(entry) if entry.is_live(self.ttl) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(Arc::clone(&entry.asset));
            }
            Some(_) => true,
            None => false,
        };

        // The shard guard is released above; only drop the entry if it is
        // still expired, so a concurrent `set` is not thrown away. Absent
        // keys never take the write lock.
        if expired {
            let ttl = self.ttl;
            if self
                .entries
                .remove_if(id, |_, entry| !entry.is_live(ttl))
                .is_some()
            {
                tracing::debug!(video = %id, "Location cache entry expired");
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Install `asset` under its id, replacing any previous entry.
    pub fn set(&self, asset: VideoAsset) -> Arc<VideoAsset> {
        let asset = Arc::new(asset);
        self.entries.insert(
            asset.id().clone(),
            CacheEntry {
                asset: Arc::clone(&asset),
                created_at: Instant::now(),
            },
        );
        asset
    }

    /// Drop every expired entry and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.is_live(ttl));
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for LocationCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600))
    }
}
