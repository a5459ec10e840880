//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which owns a temporary media directory and a
//! full [`AppContext`] over a [`CountingStore`]. The [`TestHarness::with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use rc_core::config::Config;
use rc_core::{FsMediaStore, MediaReader, MediaStore, VideoAsset, VideoId};
use rc_server::context::AppContext;
use rc_server::router::build_router;

/// Filesystem store that counts storage lookups.
pub struct CountingStore {
    inner: FsMediaStore,
    stats: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: FsMediaStore) -> Self {
        Self {
            inner,
            stats: AtomicUsize::new(0),
        }
    }

    pub fn stat_calls(&self) -> usize {
        self.stats.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaStore for CountingStore {
    async fn stat(&self, id: &VideoId) -> rc_core::Result<VideoAsset> {
        self.stats.fetch_add(1, Ordering::SeqCst);
        self.inner.stat(id).await
    }

    async fn open_range(
        &self,
        asset: &VideoAsset,
        start: u64,
        length: u64,
    ) -> rc_core::Result<MediaReader> {
        self.inner.open_range(asset, start, length).await
    }

    async fn list(&self) -> rc_core::Result<Vec<String>> {
        self.inner.list().await
    }
}

/// Test harness wrapping a fully-constructed [`AppContext`] backed by a
/// temporary media directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub store: Arc<CountingStore>,
    pub media: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. The media directory
    /// is always replaced with a fresh temp directory.
    pub fn with_config(mut config: Config) -> Self {
        let media = tempfile::tempdir().expect("failed to create media dir");
        config.server.media_dir = media.path().to_path_buf();
        config.server.static_dir = None;

        let store = Arc::new(CountingStore::new(FsMediaStore::new(
            media.path(),
            config.streaming.content_type.clone(),
            config.streaming.extension.clone(),
        )));
        let ctx = AppContext::new(config, store.clone());

        Self { ctx, store, media }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = build_router(harness.ctx.clone(), None);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Write `data` as `name` in the media directory.
    pub fn add_video(&self, name: &str, data: &[u8]) {
        std::fs::write(self.media.path().join(name), data).expect("failed to write video");
    }

    pub fn media_path(&self) -> &Path {
        self.media.path()
    }
}

/// Deterministic content where every byte depends on its offset and `seed`.
pub fn patterned_bytes(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}
