//! Periodic removal of expired location cache entries.
//!
//! Expiry is always enforced on read; the sweeper only keeps entries that
//! are never requested again from accumulating.

use std::sync::Arc;
use std::time::Duration;

use rc_core::LocationCache;
use tokio_util::sync::CancellationToken;

/// Purge expired entries every `interval` until `cancel` fires.
pub async fn run_cache_sweeper(
    cache: Arc<LocationCache>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = cache.purge_expired();
                if removed > 0 {
                    tracing::debug!(removed, remaining = cache.len(), "Swept expired cache entries");
                }
            }
            _ = cancel.cancelled() => break,
        }
    }

    tracing::debug!("Cache sweeper stopped");
}
