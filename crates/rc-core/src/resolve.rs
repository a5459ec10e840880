//! Asset resolution through the location cache.

use std::sync::Arc;

use crate::asset::VideoAsset;
use crate::cache::LocationCache;
use crate::error::{Error, Result};
use crate::ids::VideoId;
use crate::store::MediaStore;

/// Outcome of a successful resolve.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub asset: Arc<VideoAsset>,
    pub from_cache: bool,
}

/// Resolves a [`VideoId`] to a verified asset, consulting the cache first and
/// stat-ing storage only on a miss.
#[derive(Clone)]
pub struct AssetResolver {
    store: Arc<dyn MediaStore>,
    cache: Arc<LocationCache>,
}

impl AssetResolver {
    pub fn new(store: Arc<dyn MediaStore>, cache: Arc<LocationCache>) -> Self {
        Self { store, cache }
    }

    pub fn store(&self) -> &Arc<dyn MediaStore> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<LocationCache> {
        &self.cache
    }

    /// Look up `id`.
    ///
    /// Any storage failure is reported as [`Error::NotFound`] and leaves the
    /// cache untouched; the real cause is only logged.
    pub async fn resolve(&self, id: &VideoId) -> Result<Resolution> {
        if let Some(asset) = self.cache.get(id) {
            tracing::debug!(video = %id, "Serving location from cache");
            return Ok(Resolution {
                asset,
                from_cache: true,
            });
        }

        match self.store.stat(id).await {
            Ok(asset) => {
                tracing::debug!(video = %id, size = asset.size(), "Resolved video from storage");
                Ok(Resolution {
                    asset: self.cache.set(asset),
                    from_cache: false,
                })
            }
            Err(Error::NotFound { .. }) => Err(Error::not_found("video", id)),
            Err(e) => {
                tracing::warn!(video = %id, error = %e, "Storage lookup failed");
                Err(Error::not_found("video", id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MediaReader;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Store that knows one fixed asset and counts stat calls.
    struct CountingStore {
        stats: AtomicUsize,
        present: bool,
        broken: bool,
    }

    impl CountingStore {
        fn new(present: bool) -> Self {
            Self {
                stats: AtomicUsize::new(0),
                present,
                broken: false,
            }
        }
    }

    #[async_trait]
    impl MediaStore for CountingStore {
        async fn stat(&self, id: &VideoId) -> Result<VideoAsset> {
            self.stats.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(Error::from(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "denied",
                )));
            }
            if !self.present {
                return Err(Error::not_found("video", id));
            }
            Ok(VideoAsset::new(id.clone(), "/media/x", 42, "video/mp4"))
        }

        async fn open_range(&self, _: &VideoAsset, _: u64, _: u64) -> Result<MediaReader> {
            Err(Error::Internal("not used".into()))
        }

        async fn list(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn id() -> VideoId {
        VideoId::parse("x.mp4").unwrap()
    }

    fn resolver(store: Arc<CountingStore>, ttl_secs: u64) -> AssetResolver {
        AssetResolver::new(
            store,
            Arc::new(LocationCache::new(Duration::from_secs(ttl_secs))),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn hits_skip_storage() {
        let store = Arc::new(CountingStore::new(true));
        let resolver = resolver(Arc::clone(&store), 3600);

        let first = resolver.resolve(&id()).await.unwrap();
        assert!(!first.from_cache);

        for _ in 0..10 {
            let again = resolver.resolve(&id()).await.unwrap();
            assert!(again.from_cache);
            assert_eq!(again.asset.size(), 42);
        }
        assert_eq!(store.stats.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_triggers_exactly_one_fresh_stat() {
        let store = Arc::new(CountingStore::new(true));
        let resolver = resolver(Arc::clone(&store), 3600);

        resolver.resolve(&id()).await.unwrap();
        tokio::time::advance(Duration::from_secs(3600)).await;

        let after = resolver.resolve(&id()).await.unwrap();
        assert!(!after.from_cache);
        resolver.resolve(&id()).await.unwrap();
        assert_eq!(store.stats.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn missing_asset_is_not_cached() {
        let store = Arc::new(CountingStore::new(false));
        let resolver = resolver(Arc::clone(&store), 3600);

        for _ in 0..3 {
            let err = resolver.resolve(&id()).await.unwrap_err();
            assert!(matches!(err, Error::NotFound { .. }));
        }
        assert_eq!(store.stats.load(Ordering::SeqCst), 3);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn storage_errors_surface_as_not_found() {
        let store = Arc::new(CountingStore {
            stats: AtomicUsize::new(0),
            present: true,
            broken: true,
        });
        let resolver = resolver(store, 3600);

        let err = resolver.resolve(&id()).await.unwrap_err();
        assert_eq!(err.http_status(), 404);
        assert!(resolver.cache().is_empty());
    }
}
