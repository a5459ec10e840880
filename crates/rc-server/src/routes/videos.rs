//! Video listing route.

use axum::extract::State;
use axum::Json;

use crate::context::AppContext;
use crate::error::AppError;

/// GET /videos -- names of every video in the media directory.
pub async fn list_videos(State(ctx): State<AppContext>) -> Result<Json<Vec<String>>, AppError> {
    let names = ctx.resolver.store().list().await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to list media directory");
        rc_core::Error::Internal("Unable to scan videos directory".into())
    })?;

    Ok(Json(names))
}
