//! Video streaming route: `GET /video/{name}`.
//!
//! Resolves the name through the location cache, parses `Range`, plans the
//! chunk, and hands the span to the [`StreamResponder`](crate::responder::StreamResponder).

use axum::extract::{Extension, Path, State};
use axum::http::{header, HeaderMap};
use axum::response::Response;

use rc_core::range::parse_range;
use rc_core::{Error, VideoId};

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;

/// GET /video/{name} -- full or byte-range delivery of a video.
pub async fn stream_video(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    serve_video(&ctx, &name, &headers)
        .await
        .map_err(|e| AppError::new(e).with_request_id(request_id.0))
}

async fn serve_video(
    ctx: &AppContext,
    name: &str,
    headers: &HeaderMap,
) -> rc_core::Result<Response> {
    let id = VideoId::parse(name).map_err(|e| {
        tracing::debug!(name, error = %e, "Rejected video name");
        Error::not_found("video", name)
    })?;

    let resolution = ctx.resolver.resolve(&id).await?;
    let asset = resolution.asset;

    let raw_range = headers
        .get(header::RANGE)
        .map(|v| {
            v.to_str()
                .map_err(|_| Error::malformed_range("Range header is not valid ASCII"))
        })
        .transpose()?;
    let range = parse_range(raw_range)?;

    let plan = ctx.planner.plan(range.as_ref(), asset.size())?;

    let reader = ctx
        .resolver
        .store()
        .open_range(&asset, plan.start(), plan.length())
        .await
        .map_err(|e| {
            tracing::warn!(video = %id, error = %e, "Failed to open video for streaming");
            Error::not_found("video", &id)
        })?;

    if plan.is_partial() {
        let span = format!("{}-{}", plan.start(), plan.end());
        tracing::info!(
            video = %id,
            path = %asset.path().display(),
            range = %span,
            duration_secs = ctx.planner.estimated_duration_secs(&plan),
            cached = resolution.from_cache,
            "Serving video chunk"
        );
    } else {
        tracing::info!(
            video = %id,
            path = %asset.path().display(),
            size = plan.total_size(),
            cached = resolution.from_cache,
            "Serving full video"
        );
    }

    ctx.responder.respond(&asset, &plan, reader)
}
