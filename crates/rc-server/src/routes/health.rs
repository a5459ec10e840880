//! Health check route.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::context::AppContext;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub cache_entries: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub history_entries: usize,
}

/// GET /health
pub async fn health_check(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    let stats = ctx.cache().stats();
    let uptime_secs = (Utc::now() - ctx.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok",
        uptime_secs,
        cache_entries: stats.entries,
        cache_hits: stats.hits,
        cache_misses: stats.misses,
        history_entries: ctx.history.len(),
    })
}
