//! Axum router construction.
//!
//! Builds the application router with the streaming, listing, history, and
//! health routes, the middleware stack, and static file serving.

use axum::middleware;
use axum::routing::get;
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app: Router<AppContext> = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/videos", get(routes::videos::list_videos))
        .route("/video/{name}", get(routes::stream::stream_video))
        .route(
            "/history",
            get(routes::history::list_history).post(routes::history::record_playback),
        );

    // Static file serving for the player UI. Must precede the layers so
    // asset requests get traced and a request id.
    if let Some(dir) = static_dir {
        if dir.is_dir() {
            tracing::info!("Serving static files from {:?}", dir);
            app = app.fallback_service(ServeDir::new(&dir).append_index_html_on_directories(true));
        } else {
            tracing::debug!("Static directory {:?} not found; skipping", dir);
        }
    }

    app.layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
