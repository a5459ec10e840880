//! Playback history routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct RecordPlaybackRequest {
    #[serde(default)]
    pub video: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordPlaybackResponse {
    pub message: &'static str,
    pub video: String,
    pub recorded_at: DateTime<Utc>,
}

/// POST /history -- append a played video to the history log.
pub async fn record_playback(
    State(ctx): State<AppContext>,
    payload: Result<Json<RecordPlaybackRequest>, JsonRejection>,
) -> Result<Json<RecordPlaybackResponse>, AppError> {
    let Json(request) = payload
        .map_err(|e| rc_core::Error::Validation(format!("invalid request body: {e}")))?;

    let video = request
        .video
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| rc_core::Error::Validation("`video` is required".into()))?;

    let entry = ctx.history.record(video);
    tracing::debug!(video = %entry.video, "Recorded playback");

    Ok(Json(RecordPlaybackResponse {
        message: "Video added to history",
        video: entry.video,
        recorded_at: entry.recorded_at,
    }))
}

/// GET /history -- every recorded video name, oldest first.
pub async fn list_history(State(ctx): State<AppContext>) -> Json<Vec<String>> {
    Json(ctx.history.videos())
}
