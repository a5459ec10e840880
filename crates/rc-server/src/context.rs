//! Application context shared by all request handlers (via Axum state).
//!
//! Every long-lived component is constructed here and injected, so tests can
//! swap the media store or tune the planner without touching globals.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use rc_core::config::Config;
use rc_core::history::PlaybackHistory;
use rc_core::{AssetResolver, ChunkPlanner, FsMediaStore, LocationCache, MediaStore};

use crate::responder::StreamResponder;

/// Cheaply cloneable handle to the server's components.
#[derive(Clone)]
pub struct AppContext {
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Cache-first asset lookup.
    pub resolver: AssetResolver,
    pub planner: ChunkPlanner,
    pub responder: StreamResponder,
    /// Playback history reported by clients.
    pub history: Arc<PlaybackHistory>,
    pub started_at: DateTime<Utc>,
}

impl AppContext {
    /// Build a context over an arbitrary media store.
    pub fn new(config: Config, store: Arc<dyn MediaStore>) -> Self {
        let cache = Arc::new(LocationCache::new(Duration::from_secs(config.cache.ttl_secs)));
        let planner = ChunkPlanner::from_config(&config.streaming);
        let responder = StreamResponder::new(config.streaming.effective_read_buffer());
        let history = Arc::new(PlaybackHistory::new(config.history.max_entries));

        Self {
            resolver: AssetResolver::new(store, cache),
            planner,
            responder,
            history,
            config: Arc::new(config),
            started_at: Utc::now(),
        }
    }

    /// Build a context serving files from `config.server.media_dir`.
    pub fn from_config(config: Config) -> Self {
        let store = Arc::new(FsMediaStore::new(
            config.server.media_dir.clone(),
            config.streaming.content_type.clone(),
            config.streaming.extension.clone(),
        ));
        Self::new(config, store)
    }

    pub fn cache(&self) -> &Arc<LocationCache> {
        self.resolver.cache()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_reflects_config() {
        let mut config = Config::default();
        config.streaming.chunk_duration_secs = 10;
        config.cache.ttl_secs = 5;
        config.history.max_entries = Some(3);

        let ctx = AppContext::from_config(config);
        assert_eq!(ctx.planner.max_chunk_bytes(), 160_000);
        assert_eq!(ctx.cache().ttl(), Duration::from_secs(5));
        assert!(ctx.history.is_empty());
    }
}
